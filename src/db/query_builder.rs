use sea_orm::sea_query::Expr;
use sea_orm::{Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

/// Builder for partial updates assembled from optional named field values.
///
/// Collects only the fields a caller actually supplied and produces a
/// single parameterized UPDATE statement. Callers must check
/// [`UpdateBuilder::is_empty`] before executing; an update with no fields
/// is a caller bug, not something this builder papers over.
pub struct UpdateBuilder<E: EntityTrait> {
    updates: Vec<(E::Column, sea_orm::Value)>,
}

impl<E: EntityTrait> UpdateBuilder<E> {
    pub fn new() -> Self {
        Self {
            updates: Vec::new(),
        }
    }

    /// Stage a column assignment.
    pub fn set<V>(mut self, column: E::Column, value: V) -> Self
    where
        V: Into<sea_orm::Value>,
    {
        self.updates.push((column, value.into()));
        self
    }

    /// Stage a column assignment only when a value was supplied.
    pub fn set_optional<V>(self, column: E::Column, value: Option<V>) -> Self
    where
        V: Into<sea_orm::Value>,
    {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    /// True when no field updates have been staged.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Number of staged field updates.
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Execute the update against rows matching `condition`, returning the
    /// affected-row count. The statement either fully applies or not at all.
    pub async fn exec<C>(self, db: &C, condition: Condition) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        debug_assert!(!self.is_empty(), "UpdateBuilder executed with no fields");

        let mut update = E::update_many().filter(condition);
        for (column, value) in self.updates {
            update = update.col_expr(column, Expr::value(value));
        }

        let result = update.exec(db).await?;
        Ok(result.rows_affected)
    }
}

impl<E: EntityTrait> Default for UpdateBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sales_order;

    #[test]
    fn tracks_only_supplied_fields() {
        let builder = UpdateBuilder::<sales_order::Entity>::new()
            .set_optional(sales_order::Column::Status, Some("D".to_string()))
            .set_optional(sales_order::Column::Remarks, None::<String>);

        assert!(!builder.is_empty());
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn empty_when_nothing_supplied() {
        let builder = UpdateBuilder::<sales_order::Entity>::new()
            .set_optional(sales_order::Column::Status, None::<String>)
            .set_optional(sales_order::Column::Remarks, None::<String>);

        assert!(builder.is_empty());
    }
}

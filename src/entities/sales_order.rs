use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order header. Lines live in [`super::sales_order_line`] and are removed
/// by cascade when the header row goes away.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// External reference number; absent for orders created without one.
    pub reference_number: Option<i64>,

    pub customer_code: String,

    /// Owning user.
    pub user_id: i64,

    /// Short free-form status code (e.g. "P", "D", "R"). The core does not
    /// constrain transitions.
    pub status: Option<String>,

    pub remarks: Option<String>,

    /// Set once at creation, never updated afterwards.
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sales_order_line::Entity")]
    SalesOrderLine,
}

impl Related<super::sales_order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesOrderLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One item entry on an order.
///
/// `requested_value` and `approved_value` are derived by the valuation
/// function from their quantity/rate pairs and are recomputed on every
/// mutation of the source fields; they are never accepted from callers.
/// `approved_value` is zero (not NULL) while the line is unapproved.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_order_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub order_id: i64,

    /// Denormalized copy of the header's external reference number.
    pub reference_number: Option<i64>,

    pub item_code: String,
    pub item_name: Option<String>,

    /// Opaque policy/discount descriptors, passed through untouched.
    pub policy_code: Option<String>,
    pub policy_detail: Option<String>,

    pub requested_qty: Decimal,
    pub policy_rate: Option<Decimal>,
    pub requested_rate: Decimal,

    pub approved_qty: Option<Decimal>,
    pub approved_rate: Option<Decimal>,

    pub requested_value: Decimal,
    pub approved_value: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales_order::Entity",
        from = "Column::OrderId",
        to = "super::sales_order::Column::Id"
    )]
    SalesOrder,
}

impl Related<super::sales_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

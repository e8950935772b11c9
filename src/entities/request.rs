use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One purchased line item within an order. Every request belongs to exactly
/// one payment (`payment_id`) and references one product (`product_id`);
/// requests under the same payment may span different products and stores.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub payment_id: String,
    pub price: Decimal,
    pub tax: Decimal,
    pub track: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub store_id: i32,
    pub product_id: i32,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

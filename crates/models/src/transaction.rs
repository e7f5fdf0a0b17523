//! Sale records (`transaksi`). Rows are immutable once inserted; the total is
//! frozen from the product price at insert time.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{customer, errors, product, user};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaksi")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: i64,
    pub transaction_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Customer,
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Customer => Entity::belongs_to(customer::Entity)
                .from(Column::CustomerId)
                .to(customer::Column::Id)
                .into(),
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_quantity(quantity: i64) -> Result<i32, errors::ModelError> {
    match i32::try_from(quantity) {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(errors::ModelError::Validation("qty must be a positive integer".into())),
    }
}

/// `unit_price × quantity`, rejecting overflow.
pub fn total_price(unit_price: i64, quantity: i32) -> Result<i64, errors::ModelError> {
    unit_price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| errors::ModelError::Validation("total price overflows".into()))
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_price(price: i64) -> Result<(), errors::ModelError> {
    if price <= 0 {
        return Err(errors::ModelError::Validation("price must be a positive number".into()));
    }
    Ok(())
}

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use models::customer;
use crate::{errors::ServiceError, write_result::WriteResult};

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone_number: String,
    pub address: String,
}

pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>, ServiceError> {
    let customers = customer::Entity::find()
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await?;
    Ok(customers)
}

pub async fn get_customer_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<customer::Model>, ServiceError> {
    Ok(customer::Entity::find_by_id(id).one(db).await?)
}

pub async fn add_customer(db: &DatabaseConnection, new: NewCustomer) -> Result<WriteResult, ServiceError> {
    let am = customer::ActiveModel {
        name: Set(new.name),
        phone_number: Set(new.phone_number),
        address: Set(new.address),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let res = customer::Entity::insert(am).exec(db).await?;
    Ok(WriteResult::inserted(res.last_insert_id))
}

pub async fn update_customer(db: &DatabaseConnection, id: i32, changes: &NewCustomer) -> Result<WriteResult, ServiceError> {
    let res = customer::Entity::update_many()
        .col_expr(customer::Column::Name, Expr::value(changes.name.clone()))
        .col_expr(customer::Column::PhoneNumber, Expr::value(changes.phone_number.clone()))
        .col_expr(customer::Column::Address, Expr::value(changes.address.clone()))
        .filter(customer::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(WriteResult::affected(res.rows_affected))
}

pub async fn delete_customer(db: &DatabaseConnection, id: i32) -> Result<WriteResult, ServiceError> {
    let res = customer::Entity::delete_by_id(id).exec(db).await?;
    Ok(WriteResult::affected(res.rows_affected))
}

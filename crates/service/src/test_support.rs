#![cfg(test)]
use chrono::Utc;
use configs::DatabaseConfig;
use models::db::{connect_with_config, ensure_schema};
use models::{customer, product, user, Role};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

/// Fresh in-memory database with the schema in place; each call is isolated.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::in_memory()).await?;
    ensure_schema(&db).await?;
    Ok(db)
}

pub async fn seed_user(db: &DatabaseConnection, username: &str, role: Role) -> Result<i32, anyhow::Error> {
    let am = user::ActiveModel {
        name: Set(format!("{username} name")),
        username: Set(username.to_string()),
        email: Set(format!("{username}@laundry.test")),
        password: Set("not-a-hash".into()),
        role: Set(role),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(user::Entity::insert(am).exec(db).await?.last_insert_id)
}

pub async fn seed_product(db: &DatabaseConnection, name: &str, price: i64) -> Result<i32, anyhow::Error> {
    let am = product::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        kind: Set("kiloan".into()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(product::Entity::insert(am).exec(db).await?.last_insert_id)
}

pub async fn seed_customer(db: &DatabaseConnection, name: &str) -> Result<i32, anyhow::Error> {
    let am = customer::ActiveModel {
        name: Set(name.to_string()),
        phone_number: Set("08123456789".into()),
        address: Set("Jl. Melati 3".into()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(customer::Entity::insert(am).exec(db).await?.last_insert_id)
}

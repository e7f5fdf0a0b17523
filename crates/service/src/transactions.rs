//! Sales. Reads go through one four-way join so list and detail views share
//! a row shape.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, Set, Statement};

use models::transaction;
use crate::{errors::ServiceError, write_result::WriteResult};

const JOINED_SELECT: &str = r#"SELECT
    users.id AS user_id,
    users.name AS user_name,
    users.email AS user_email,
    users.role AS user_role,
    customers.id AS customers_id,
    customers.name AS customers_name,
    customers."phoneNumber" AS customers_phone,
    customers.address AS customers_address,
    transaksi.id AS transaksi_id,
    transaksi.quantity AS transaksi_quantity,
    transaksi.total_price AS transaksi_total_price,
    transaksi.transaction_date AS transaksi_date,
    products.id AS product_id,
    products.name AS product_name,
    products.price AS product_price,
    products."type" AS product_type
FROM transaksi
JOIN customers ON transaksi.customer_id = customers.id
JOIN products ON transaksi.product_id = products.id
JOIN users ON transaksi.user_id = users.id"#;

/// Flattened join of a sale with its seller, customer and product.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct TransactionRow {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
    pub customers_id: i32,
    pub customers_name: String,
    pub customers_phone: String,
    pub customers_address: String,
    pub transaksi_id: i32,
    pub transaksi_quantity: i32,
    pub transaksi_total_price: i64,
    pub transaksi_date: chrono::DateTime<Utc>,
    pub product_id: i32,
    pub product_name: String,
    pub product_price: i64,
    pub product_type: String,
}

/// A sale ready to insert; `total_price` is already computed.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i32,
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: i64,
}

fn joined(tail: &str) -> String {
    format!("{JOINED_SELECT} {tail}")
}

pub async fn list_transactions(db: &DatabaseConnection) -> Result<Vec<TransactionRow>, ServiceError> {
    let backend = db.get_database_backend();
    let stmt = Statement::from_string(backend, joined("ORDER BY transaksi.id"));
    Ok(TransactionRow::find_by_statement(stmt).all(db).await?)
}

pub async fn get_transaction_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<TransactionRow>, ServiceError> {
    let backend = db.get_database_backend();
    let stmt = Statement::from_sql_and_values(backend, joined("WHERE transaksi.id = ?"), [id.into()]);
    Ok(TransactionRow::find_by_statement(stmt).one(db).await?)
}

/// Unknown user, customer or product ids surface as `ForeignKey`.
pub async fn add_transaction(db: &DatabaseConnection, new: NewTransaction) -> Result<WriteResult, ServiceError> {
    let am = transaction::ActiveModel {
        user_id: Set(new.user_id),
        customer_id: Set(new.customer_id),
        product_id: Set(new.product_id),
        quantity: Set(new.quantity),
        total_price: Set(new.total_price),
        transaction_date: Set(Utc::now()),
        ..Default::default()
    };
    let res = transaction::Entity::insert(am).exec(db).await?;
    Ok(WriteResult::inserted(res.last_insert_id))
}

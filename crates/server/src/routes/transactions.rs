use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use models::transaction;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use service::customers;
use service::products;
use service::transactions::{self, NewTransaction, TransactionRow};
use service::ServiceError;

use crate::envelope::{Envelope, Mutation};
use crate::errors::ApiError;
use crate::extract::{positive, ApiJson, ApiPath};
use crate::policy::AuthContext;
use crate::routes::auth::ServerState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCustomer {
    pub id: i32,
    pub name: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionAdmin {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionProduct {
    pub id: i32,
    pub name: String,
    /// Current catalogue price, not the price the sale was made at.
    pub price: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    pub product: TransactionProduct,
    pub qty: i32,
    pub total_price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: i32,
    pub transc_date: DateTime<Utc>,
    pub customer: TransactionCustomer,
    pub admin: TransactionAdmin,
    pub transc_detail: TransactionDetail,
}

impl From<TransactionRow> for TransactionView {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.transaksi_id,
            transc_date: row.transaksi_date,
            customer: TransactionCustomer {
                id: row.customers_id,
                name: row.customers_name,
                phone_number: row.customers_phone,
                address: row.customers_address,
            },
            admin: TransactionAdmin { id: row.user_id, name: row.user_name, email: row.user_email, role: row.user_role },
            transc_detail: TransactionDetail {
                product: TransactionProduct {
                    id: row.product_id,
                    name: row.product_name,
                    price: row.product_price,
                    kind: row.product_type,
                },
                qty: row.transaksi_quantity,
                total_price: row.transaksi_total_price,
            },
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub customer_id: Option<i32>,
    pub product_id: Option<i32>,
    pub qty: Option<i64>,
}

#[utoipa::path(get, path = "/api/v1/transactions", tag = "transactions", security(("bearer" = [])), responses((status = 200, description = "All sales", body = [TransactionView])))]
pub async fn list_transactions(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<TransactionView>>>, ApiError> {
    let rows = transactions::list_transactions(&state.db).await?;
    Ok(Envelope::ok(rows.into_iter().map(TransactionView::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/transactions/{id}", tag = "transactions", security(("bearer" = [])), params(("id" = i32, Path, description = "Transaction id")), responses((status = 200, description = "Sale", body = TransactionView), (status = 404, description = "Transaction not found")))]
pub async fn get_transaction(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<TransactionView>>, ApiError> {
    let row = transactions::get_transaction_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;
    Ok(Envelope::ok(row.into()))
}

/// Record a sale by the calling staff member; the total is frozen from the
/// product's current price.
#[utoipa::path(post, path = "/api/v1/transactions", tag = "transactions", security(("bearer" = [])), request_body = TransactionRequest, responses((status = 201, description = "Created"), (status = 400, description = "Invalid body"), (status = 404, description = "Customer or product not found")))]
pub async fn create_transaction(
    State(state): State<ServerState>,
    ctx: AuthContext,
    ApiJson(body): ApiJson<TransactionRequest>,
) -> Result<(StatusCode, Json<Mutation<TransactionView>>), ApiError> {
    let customer_id = body.customer_id.filter(|id| *id > 0).ok_or(ApiError::InvalidBody)?;
    let product_id = body.product_id.filter(|id| *id > 0).ok_or(ApiError::InvalidBody)?;
    let quantity = transaction::validate_quantity(positive(body.qty)?).map_err(|_| ApiError::InvalidBody)?;

    let unit_price = products::get_product_price(&state.db, product_id)
        .await?
        .ok_or_else(|| ApiError::MissingReference("Product ID not found".into()))?;
    let total_price = transaction::total_price(unit_price, quantity).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let new = NewTransaction { user_id: ctx.user_id, customer_id, product_id, quantity, total_price };
    let result = match transactions::add_transaction(&state.db, new).await {
        Ok(result) => result,
        Err(ServiceError::ForeignKey(_)) => return Err(missing_reference(&state, customer_id).await),
        Err(e) => return Err(e.into()),
    };
    let id = result.last_insert_id.ok_or_else(|| ApiError::Store("insert returned no id".into()))?;
    let row = transactions::get_transaction_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::Store(format!("transaction {id} missing after insert")))?;
    info!(transaction_id = id, user_id = ctx.user_id, customer_id, product_id, total_price, "transaction_created");
    Ok(Mutation::created("Transaction added successfully", result, row.into()))
}

/// Name the reference that made the insert fail. The product was just read,
/// so it is either the customer or the caller's own account.
async fn missing_reference(state: &ServerState, customer_id: i32) -> ApiError {
    match customers::get_customer_by_id(&state.db, customer_id).await {
        Ok(Some(_)) => ApiError::MissingReference("User ID not found".into()),
        Ok(None) => ApiError::MissingReference("Customer ID not found".into()),
        Err(e) => e.into(),
    }
}

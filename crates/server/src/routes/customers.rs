use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use models::customer;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use service::customers::{self, NewCustomer};

use crate::envelope::{Envelope, Mutation};
use crate::errors::ApiError;
use crate::extract::{required, ApiJson, ApiPath};
use crate::routes::{auth::ServerState, ensure_changed, reject_reference};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: i32,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<customer::Model> for CustomerView {
    fn from(c: customer::Model) -> Self {
        Self { id: c.id, name: c.name, phone_number: c.phone_number, address: c.address, created_at: c.created_at }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl CustomerRequest {
    fn into_new(self) -> Result<NewCustomer, ApiError> {
        Ok(NewCustomer {
            name: required(self.name)?,
            phone_number: required(self.phone_number)?,
            address: required(self.address)?,
        })
    }
}

async fn load_customer(state: &ServerState, id: i32) -> Result<customer::Model, ApiError> {
    customers::get_customer_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".into()))
}

#[utoipa::path(get, path = "/api/v1/customers", tag = "customers", security(("bearer" = [])), responses((status = 200, description = "All customers")))]
pub async fn list_customers(State(state): State<ServerState>) -> Result<Json<Envelope<Vec<CustomerView>>>, ApiError> {
    let all = customers::list_customers(&state.db).await?;
    Ok(Envelope::ok(all.into_iter().map(CustomerView::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/customers/{id}", tag = "customers", security(("bearer" = [])), params(("id" = i32, Path, description = "Customer id")), responses((status = 200, description = "Customer"), (status = 404, description = "Customer not found")))]
pub async fn get_customer(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<CustomerView>>, ApiError> {
    Ok(Envelope::ok(load_customer(&state, id).await?.into()))
}

#[utoipa::path(post, path = "/api/v1/customers", tag = "customers", security(("bearer" = [])), request_body = CustomerRequest, responses((status = 201, description = "Created"), (status = 400, description = "Invalid body")))]
pub async fn create_customer(
    State(state): State<ServerState>,
    ApiJson(body): ApiJson<CustomerRequest>,
) -> Result<(StatusCode, Json<Mutation<CustomerView>>), ApiError> {
    let result = customers::add_customer(&state.db, body.into_new()?).await?;
    let id = result.last_insert_id.ok_or_else(|| ApiError::Store("insert returned no id".into()))?;
    let created = load_customer(&state, id).await?;
    info!(customer_id = id, "customer_created");
    Ok(Mutation::created("Customer added successfully", result, created.into()))
}

#[utoipa::path(put, path = "/api/v1/customers/{id}", tag = "customers", security(("bearer" = [])), params(("id" = i32, Path, description = "Customer id")), request_body = CustomerRequest, responses((status = 201, description = "Updated"), (status = 400, description = "Invalid body or unknown id")))]
pub async fn update_customer(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<CustomerRequest>,
) -> Result<(StatusCode, Json<Mutation<CustomerView>>), ApiError> {
    let result = customers::update_customer(&state.db, id, &body.into_new()?).await?;
    let result = ensure_changed(result, "updated", "Customer")?;
    let updated = load_customer(&state, id).await?;
    Ok(Mutation::created("Customer updated successfully", result, updated.into()))
}

#[utoipa::path(delete, path = "/api/v1/customers/{id}", tag = "customers", security(("bearer" = [])), params(("id" = i32, Path, description = "Customer id")), responses((status = 200, description = "Deleted"), (status = 400, description = "Unknown id or still referenced")))]
pub async fn delete_customer(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(StatusCode, Json<Mutation<()>>), ApiError> {
    let result = customers::delete_customer(&state.db, id).await.map_err(reject_reference("Customer"))?;
    let result = ensure_changed(result, "deleted", "Customer")?;
    info!(customer_id = id, "customer_deleted");
    Ok(Mutation::deleted("Customer deleted successfully", result))
}

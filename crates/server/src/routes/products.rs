use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use models::product;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use service::products::{self, NewProduct};

use crate::envelope::{Envelope, Mutation};
use crate::errors::ApiError;
use crate::extract::{positive, required, ApiJson, ApiPath};
use crate::routes::{auth::ServerState, ensure_changed, reject_reference};

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub price: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<product::Model> for ProductView {
    fn from(p: product::Model) -> Self {
        Self { id: p.id, name: p.name, price: p.price, kind: p.kind, created_at: p.created_at }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ProductRequest {
    fn into_new(self) -> Result<NewProduct, ApiError> {
        Ok(NewProduct { name: required(self.name)?, price: positive(self.price)?, kind: required(self.kind)? })
    }
}

async fn load_product(state: &ServerState, id: i32) -> Result<product::Model, ApiError> {
    products::get_product_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))
}

#[utoipa::path(get, path = "/api/v1/products", tag = "products", security(("bearer" = [])), responses((status = 200, description = "All products")))]
pub async fn list_products(State(state): State<ServerState>) -> Result<Json<Envelope<Vec<ProductView>>>, ApiError> {
    let all = products::list_products(&state.db).await?;
    Ok(Envelope::ok(all.into_iter().map(ProductView::from).collect()))
}

#[utoipa::path(get, path = "/api/v1/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")), responses((status = 200, description = "Product"), (status = 404, description = "Product not found")))]
pub async fn get_product(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<ProductView>>, ApiError> {
    Ok(Envelope::ok(load_product(&state, id).await?.into()))
}

#[utoipa::path(post, path = "/api/v1/products", tag = "products", security(("bearer" = [])), request_body = ProductRequest, responses((status = 201, description = "Created"), (status = 400, description = "Invalid body")))]
pub async fn create_product(
    State(state): State<ServerState>,
    ApiJson(body): ApiJson<ProductRequest>,
) -> Result<(StatusCode, Json<Mutation<ProductView>>), ApiError> {
    let result = products::add_product(&state.db, body.into_new()?).await?;
    let id = result.last_insert_id.ok_or_else(|| ApiError::Store("insert returned no id".into()))?;
    let created = load_product(&state, id).await?;
    info!(product_id = id, price = created.price, "product_created");
    Ok(Mutation::created("Product added successfully", result, created.into()))
}

#[utoipa::path(put, path = "/api/v1/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")), request_body = ProductRequest, responses((status = 201, description = "Updated"), (status = 400, description = "Invalid body or unknown id")))]
pub async fn update_product(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<ProductRequest>,
) -> Result<(StatusCode, Json<Mutation<ProductView>>), ApiError> {
    let result = products::update_product(&state.db, id, &body.into_new()?).await?;
    let result = ensure_changed(result, "updated", "Product")?;
    let updated = load_product(&state, id).await?;
    info!(product_id = id, price = updated.price, "product_updated");
    Ok(Mutation::created("Product updated successfully", result, updated.into()))
}

#[utoipa::path(delete, path = "/api/v1/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")), responses((status = 200, description = "Deleted"), (status = 400, description = "Unknown id or still referenced")))]
pub async fn delete_product(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<(StatusCode, Json<Mutation<()>>), ApiError> {
    let result = products::delete_product(&state.db, id).await.map_err(reject_reference("Product"))?;
    let result = ensure_changed(result, "deleted", "Product")?;
    info!(product_id = id, "product_deleted");
    Ok(Mutation::deleted("Product deleted successfully", result))
}

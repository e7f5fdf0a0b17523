pub mod auth;
pub mod customers;
pub mod products;
pub mod transactions;
pub mod users;

use axum::{
    http::Uri,
    middleware,
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use common::types::Health;
use service::{ServiceError, WriteResult};

use crate::errors::ApiError;
use crate::openapi;
use crate::policy::{require_access, Access};
use self::auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn not_found(uri: Uri) -> ApiError {
    warn!(%uri, "The resource not found");
    ApiError::MissingReference("The resource not found".into())
}

/// Zero affected rows means the addressed id does not exist.
pub(crate) fn ensure_changed(result: WriteResult, verb: &str, entity: &str) -> Result<WriteResult, ApiError> {
    if result.is_noop() {
        return Err(ApiError::BadRequest(format!("No rows {verb}. {entity} ID not found")));
    }
    Ok(result)
}

/// Deleting a row that sales still point at is refused rather than cascaded.
pub(crate) fn reject_reference(entity: &'static str) -> impl FnOnce(ServiceError) -> ApiError {
    move |err| match err {
        ServiceError::ForeignKey(_) => {
            ApiError::BadRequest(format!("{entity} is still referenced by existing transactions"))
        }
        other => other.into(),
    }
}

/// Put one method's handler behind token verification and the given role guard.
///
/// Guards sit on the method handlers only, so the path's method fallback
/// answers unguarded.
fn guard(route: MethodRouter<ServerState>, access: Access, state: &ServerState) -> MethodRouter<ServerState> {
    route
        .route_layer(middleware::from_fn_with_state(access, require_access))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth))
}

/// Build the full application router. Every path answers unknown methods
/// with the same JSON 404 as unknown paths.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    use Access::{Authenticated, Owner, Staff};
    let s = &state;

    let api = Router::new()
        .route("/auth/register", post(auth::register).fallback(not_found))
        .route("/auth/login", post(auth::login).fallback(not_found))
        .route(
            "/profile",
            guard(get(users::get_profile).put(users::update_profile), Authenticated, s).fallback(not_found),
        )
        .route("/users/:id", guard(get(users::get_user), Authenticated, s).fallback(not_found))
        .route("/admin/users", guard(get(users::list_users), Staff, s).fallback(not_found))
        .route("/admin/users/:id", guard(delete(users::delete_user), Staff, s).fallback(not_found))
        .route("/owner/users/:id", guard(put(users::owner_update_user), Owner, s).fallback(not_found))
        .route(
            "/products",
            guard(get(products::list_products), Authenticated, s)
                .merge(guard(post(products::create_product), Owner, s))
                .fallback(not_found),
        )
        .route(
            "/products/:id",
            guard(get(products::get_product), Authenticated, s)
                .merge(guard(put(products::update_product).delete(products::delete_product), Owner, s))
                .fallback(not_found),
        )
        .route(
            "/customers",
            guard(get(customers::list_customers).post(customers::create_customer), Staff, s).fallback(not_found),
        )
        .route(
            "/customers/:id",
            guard(
                get(customers::get_customer)
                    .put(customers::update_customer)
                    .delete(customers::delete_customer),
                Staff,
                s,
            )
            .fallback(not_found),
        )
        .route(
            "/transactions",
            guard(get(transactions::list_transactions).post(transactions::create_transaction), Staff, s)
                .fallback(not_found),
        )
        .route("/transactions/:id", guard(get(transactions::get_transaction), Staff, s).fallback(not_found));

    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/api-docs/openapi.json", get(openapi::openapi_json).fallback(not_found))
        .nest("/api/v1", api)
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

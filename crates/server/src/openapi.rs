use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::routes::{auth, customers, products, transactions, users};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        auth::register,
        auth::login,
        users::get_profile,
        users::update_profile,
        users::get_user,
        users::list_users,
        users::delete_user,
        users::owner_update_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        transactions::list_transactions,
        transactions::get_transaction,
        transactions::create_transaction,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::RegisteredView,
            auth::SessionProfile,
            auth::LoginResponse,
            users::UserView,
            users::ProfileUpdateRequest,
            users::OwnerUpdateRequest,
            products::ProductView,
            products::ProductRequest,
            customers::CustomerView,
            customers::CustomerRequest,
            transactions::TransactionRequest,
            transactions::TransactionView,
            transactions::TransactionDetail,
            transactions::TransactionProduct,
            transactions::TransactionCustomer,
            transactions::TransactionAdmin,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "products"),
        (name = "customers"),
        (name = "transactions")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

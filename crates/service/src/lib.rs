//! Service layer for the laundry store.
//! - Data access per entity (users, products, customers, transactions).
//! - Authentication workflows and credential primitives under `auth`.
//! - Write operations report a `WriteResult` so callers can detect no-op
//!   updates and deletes.

pub mod auth;
pub mod bootstrap;
pub mod customers;
pub mod errors;
pub mod products;
pub mod transactions;
pub mod users;
pub mod write_result;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use write_result::WriteResult;

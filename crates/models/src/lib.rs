//! SeaORM entities for the laundry store plus connection and schema bootstrap.

pub mod customer;
pub mod db;
pub mod errors;
pub mod product;
pub mod role;
pub mod transaction;
pub mod user;

pub use role::Role;

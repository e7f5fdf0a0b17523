pub mod envelope;
pub mod errors;
pub mod extract;
pub mod openapi;
pub mod policy;
pub mod routes;
pub mod startup;

pub use startup::run;

//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Credential primitives (password hashing, bearer tokens) live in
//! `credentials` so the HTTP layer can verify tokens without a repository.

pub mod credentials;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;

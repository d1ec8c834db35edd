//! Blog Service Library
//!
//! CRUD API for a two-entity blog domain: authors and the posts they own.
//! Deleting an author removes every post it owns.
//!
//! # Modules
//!
//! - `config`: Configuration loaded from environment variables
//! - `db`: Per-request database sessions, schema migrations and repositories
//! - `error`: Error types and their HTTP mapping
//! - `handlers`: HTTP request handlers and route table
//! - `models`: Persisted entities
//! - `openapi`: OpenAPI document for the HTTP surface
//! - `schemas`: Request and response bodies
//! - `validation`: Untrusted input decoding and field validation

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod schemas;
pub mod validation;

pub use config::Config;
pub use error::{AppError, Result};

/// Service name used for log and pool labeling
pub const SERVICE_NAME: &str = "blog-service";

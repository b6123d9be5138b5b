//! # Gestor Shared Library
//!
//! Data-access layer shared by the task manager API server and its tests.
//!
//! ## Module Organization
//!
//! - `db`: SQLite connection pool and embedded migrations
//! - `models`: Categories, users and tasks with their CRUD operations

pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

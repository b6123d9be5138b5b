//! # Task Manager API Server Library
//!
//! REST API for tasks, the categories that group them and the users they
//! are assigned to, backed by SQLite.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors that reject with JSON errors
//! - `routes`: API route handlers
//! - `validation`: Field validators shared by request bodies

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod validation;

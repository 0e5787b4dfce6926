//! # Shoplite Shared Library
//!
//! This crate contains the models, authentication primitives, and database
//! layer shared by the Shoplite API server and its integration tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and CRUD operations (products, orders, users)
//! - `auth`: Password hashing and bearer token issue/verify
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Shoplite shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

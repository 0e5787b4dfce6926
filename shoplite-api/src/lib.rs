//! # Shoplite API Server Library
//!
//! This library provides the HTTP surface of Shoplite: three resource
//! collections (products, orders, users) plus signup/login with signed
//! bearer tokens.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;

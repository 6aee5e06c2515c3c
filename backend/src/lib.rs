//! FitControl backend library
//!
//! Exposes the HTTP layer, services and repositories so integration tests
//! can build the router against their own state.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;

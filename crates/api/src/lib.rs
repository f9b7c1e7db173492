//! Same-origin proxy server for the inventory console.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! session middleware) so integration tests and the binary entrypoint can
//! both access them.

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod proxy;
pub mod router;
pub mod routes;
pub mod state;

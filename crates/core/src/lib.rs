//! Domain types and client-side state machines for the inventory console.
//!
//! Everything here is synchronous and free of I/O so the proxy server and
//! the console workflow layer can share the same entity shapes and rules.

pub mod error;
pub mod list_state;
pub mod models;
pub mod pagination;
pub mod permissions;
pub mod resource;
pub mod stage_reorder;
pub mod types;
pub mod upload;

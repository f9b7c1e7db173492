//! Console workflow layer.
//!
//! Everything the browser console does between a user action and the proxy
//! API: typed requests, list reconciliation, debounced search, the stage
//! reorder board, the equipment creation wizard, and toast notifications.

pub mod api;
mod busy;
pub mod client;
pub mod config;
pub mod debounce;
pub mod equipment_browser;
pub mod equipment_wizard;
pub mod error;
pub mod managers;
pub mod notify;
pub mod roles;
pub mod stage_board;

#[cfg(test)]
pub(crate) mod test_helpers;

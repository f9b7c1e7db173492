//! Session cookie primitives.
//!
//! - [`cookie`] -- Reading the session cookie and building `Set-Cookie` values.
//! - [`token`] -- Expiry inspection of the backend-issued bearer token.

pub mod cookie;
pub mod token;

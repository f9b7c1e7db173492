//! Session extractors and middleware.
//!
//! - [`session::SessionToken`] -- Extracts the bearer token from the session cookie.
//! - [`session::expire_on_unauthorized`] -- Clears the cookie when the backend rejects it.
//! - [`page_guard::page_guard`] -- Redirects unauthenticated page requests to `/login`.

pub mod page_guard;
pub mod session;

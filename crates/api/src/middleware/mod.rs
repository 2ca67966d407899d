//! Request extractors for authentication.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer
//!   token. Use `Option<AuthUser>` where anonymous callers are allowed.

pub mod auth;

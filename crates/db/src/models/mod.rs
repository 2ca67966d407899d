//! Database row structs and their conversions into domain types.
//!
//! Each submodule contains a `FromRow` struct matching one table and a
//! conversion into the corresponding `ohq_core` type.

pub mod queue;
pub mod role;
pub mod session;
pub mod ticket;
pub mod user;

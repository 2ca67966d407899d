//! Domain core of the office-hours queue: ticket lifecycle, identity
//! resolution, role checks, and user visibility projections.
//!
//! Nothing here talks to a database directly; storage is reached through the
//! ports in [`store`].

pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod memory;
pub mod notifications;
pub mod projections;
pub mod queue;
pub mod roles;
pub mod store;
pub mod ticket;
pub mod types;
pub mod user;
pub mod validation;

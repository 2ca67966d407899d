//! Repository layer: one zero-sized struct per table with async SQL helpers.
//!
//! Queries are built at runtime from a shared column list per table and
//! return raw `sqlx` results; [`crate::store::PgStore`] classifies errors.

pub mod queue_repo;
pub mod role_repo;
pub mod session_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use queue_repo::QueueRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;

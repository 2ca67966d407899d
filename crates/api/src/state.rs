use std::sync::Arc;

use ohq_core::lifecycle::TicketEngine;
use ohq_core::projections::Projections;
use ohq_core::store::Stores;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Ticket creation and transitions.
    pub engine: TicketEngine,
    /// Role-sensitive user views.
    pub projections: Projections,
    /// Database pool when running on PostgreSQL; used by the health check.
    pub pool: Option<ohq_db::DbPool>,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(stores: Stores, pool: Option<ohq_db::DbPool>, config: ServerConfig) -> Self {
        Self {
            engine: TicketEngine::new(stores.clone(), config.redelete_policy),
            projections: Projections::new(stores),
            pool,
            config: Arc::new(config),
        }
    }
}

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::orchestrator::AssetOrchestrator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Asset lifecycle service. Owns the injected [`marketplace_db::store::AssetStore`].
    pub orchestrator: Arc<AssetOrchestrator>,
    /// Server configuration (JWT settings are read by the auth extractors).
    pub config: Arc<ServerConfig>,
}

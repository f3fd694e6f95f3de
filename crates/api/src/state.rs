use std::sync::Arc;

use postbridge_core::staging::StagingArea;
use postbridge_publisher::Publisher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, read-only after startup.
    pub config: Arc<ServerConfig>,
    /// Publishing platform client.
    pub publisher: Arc<dyn Publisher>,
    /// Directory staging files are written into.
    pub staging: StagingArea,
}

impl AppState {
    pub fn new(config: ServerConfig, publisher: Arc<dyn Publisher>) -> Self {
        let staging = StagingArea::new(config.upload_dir.clone());
        Self {
            config: Arc::new(config),
            publisher,
            staging,
        }
    }
}

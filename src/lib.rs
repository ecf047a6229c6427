/// Public library interface for the HabitQuest MCP server
///
/// This module exports the main server implementation and public types
/// that can be used by other applications or tests.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod mcp;
pub mod storage;
pub mod sync;
pub mod tools;

// Re-export public modules and types
pub use analytics::{AnalysisOverview, AnalysisReport, AnalyticsEngine, Coverage, PeriodProgress};
pub use domain::*;
pub use storage::{HabitStorage, SqliteStorage, StorageError, SYNC_URL_KEY};
pub use sync::{NotificationSink, NullSink, SyncNotification, SyncValue, WebhookSink};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Sync setup error: {0}")]
    Sync(#[from] sync::SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main habit server behind the MCP protocol
///
/// Owns the SQLite storage, the analytics engine, and the sink that mirrors
/// recorded changes to the configured webhook.
pub struct HabitQuestServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
    sink: Arc<dyn NotificationSink>,
    /// URL given on the command line; wins over the stored setting
    sync_url_override: Option<String>,
}

impl HabitQuestServer {
    /// Create a new server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf, sync_url_override: Option<String>) -> Result<Self, ServerError> {
        tracing::info!("Initializing HabitQuest server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Self::with_storage(storage, sync_url_override)
    }

    /// Build a server around an already opened storage
    ///
    /// Starts a webhook sink when a sync URL is configured, so this must run
    /// inside a tokio runtime in that case.
    pub fn with_storage(storage: SqliteStorage, sync_url_override: Option<String>) -> Result<Self, ServerError> {
        let mut server = Self {
            storage,
            analytics: AnalyticsEngine::new(),
            sink: Arc::new(NullSink),
            sync_url_override,
        };
        server.reload_sink()?;
        Ok(server)
    }

    /// Replace the notification sink, e.g. with a test double
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Effective webhook URL: the override, else the stored setting
    pub fn sync_url(&self) -> Result<Option<String>, ServerError> {
        if let Some(url) = &self.sync_url_override {
            return Ok(Some(url.clone()));
        }
        Ok(self.storage.get_setting(SYNC_URL_KEY)?)
    }

    pub fn sync_url_overridden(&self) -> bool {
        self.sync_url_override.is_some()
    }

    /// Rebuild the sink from the effective sync URL
    ///
    /// The previous webhook worker finishes its queue in the background.
    pub fn reload_sink(&mut self) -> Result<(), ServerError> {
        self.sink = match self.sync_url()? {
            Some(url) => {
                tracing::info!("Sync enabled, posting changes to {}", url);
                Arc::new(WebhookSink::http(url)?)
            }
            None => {
                tracing::info!("Sync disabled");
                Arc::new(NullSink)
            }
        };
        Ok(())
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin closes or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let store = self.storage.load_store()?;
        tracing::info!(
            "Server started successfully, found {} existing habits",
            store.habits.len()
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    pub fn sink(&self) -> &dyn NotificationSink {
        self.sink.as_ref()
    }
}

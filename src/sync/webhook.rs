/// Webhook sink that mirrors state changes to an external spreadsheet
///
/// Notifications are queued on an unbounded channel and delivered one by one
/// by a background task, so `notify` never waits on the network and delivery
/// order matches the order mutations were issued. Each delivery is bounded by
/// a timeout so an unresponsive webhook cannot hold up the rest of the queue.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::HabitId;
use crate::sync::{NotificationSink, SyncError, SyncNotification, SyncValue};

/// Upper bound on one delivery attempt
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON body posted to the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    /// Always "upsert": the receiver keys rows by habit id and date
    pub action: &'static str,
    pub habit_id: HabitId,
    pub habit_name: String,
    pub category: String,
    pub date: NaiveDate,
    pub value: SyncValue,
}

impl From<SyncNotification> for WebhookPayload {
    fn from(n: SyncNotification) -> Self {
        Self {
            action: "upsert",
            habit_id: n.habit_id,
            habit_name: n.habit_name,
            category: n.category,
            date: n.date,
            value: n.value,
        }
    }
}

/// Something that can deliver a payload to the sync target
#[async_trait]
pub trait SyncTransport: Send + Sync {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), SyncError>;
}

/// Transport that POSTs JSON over HTTP
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SyncTransport for HttpTransport {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), SyncError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Rejected(status.as_u16()));
        }
        Ok(())
    }
}

/// Fire-and-forget sink backed by a [`SyncTransport`]
pub struct WebhookSink {
    sender: mpsc::UnboundedSender<WebhookPayload>,
    worker: JoinHandle<()>,
}

impl WebhookSink {
    /// Start a sink posting to `url`
    ///
    /// Must be called from inside a tokio runtime.
    pub fn http(url: impl Into<String>) -> Result<Self, SyncError> {
        Ok(Self::spawn(Arc::new(HttpTransport::new(url)?)))
    }

    /// Start a sink on top of any transport
    pub fn spawn(transport: Arc<dyn SyncTransport>) -> Self {
        Self::with_timeout(transport, DELIVERY_TIMEOUT)
    }

    /// Start a sink that gives up on a delivery after `limit`
    pub fn with_timeout(transport: Arc<dyn SyncTransport>, limit: Duration) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<WebhookPayload>();

        let worker = tokio::spawn(async move {
            while let Some(payload) = receiver.recv().await {
                match tokio::time::timeout(limit, transport.deliver(&payload)).await {
                    Ok(Ok(())) => debug!(
                        "Synced habit {} on {} (value {})",
                        payload.habit_id,
                        payload.date,
                        u8::from(payload.value)
                    ),
                    Ok(Err(e)) => warn!(
                        "Sync failed for habit {} on {}: {}",
                        payload.habit_id, payload.date, e
                    ),
                    Err(_) => warn!(
                        "Sync for habit {} on {} timed out after {:?}",
                        payload.habit_id, payload.date, limit
                    ),
                }
            }
        });

        Self { sender, worker }
    }

    /// Stop accepting notifications and wait for queued ones to be attempted
    pub async fn close(self) {
        drop(self.sender);
        if let Err(e) = self.worker.await {
            warn!("Sync worker ended abnormally: {}", e);
        }
    }
}

impl NotificationSink for WebhookSink {
    fn notify(&self, notification: SyncNotification) {
        if self.sender.send(notification.into()).is_err() {
            warn!("Sync worker is gone, dropping notification");
        }
    }
}

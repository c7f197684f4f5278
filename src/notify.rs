use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Sent to an order's owner after its status changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatusChanged {
    pub order_id: Uuid,
    pub owner_id: Uuid,
    pub owner_email: Option<String>,
    pub previous_status: String,
    pub status: String,
    pub changed_at: DateTime<Utc>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn order_status_changed(&self, event: &OrderStatusChanged) -> anyhow::Result<()>;
}

/// Delivers notifications as structured log events.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_status_changed(&self, event: &OrderStatusChanged) -> anyhow::Result<()> {
        tracing::info!(
            target: "notifications",
            owner_id = %event.owner_id,
            owner_email = event.owner_email.as_deref().unwrap_or("-"),
            order_id = %event.order_id,
            previous_status = %event.previous_status,
            status = %event.status,
            "order status changed"
        );
        Ok(())
    }
}

//! Fire-and-forget notification collaborator.
//!
//! The workflow service tells the notifier about status changes and photo
//! uploads after they are persisted. Delivery outcome never feeds back into
//! the workflow.

use crate::state_machine::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNotification {
    pub event_name: String,
    pub order_id: Uuid,
    pub order_number: String,
    /// Owning customer, the usual recipient
    pub user: String,
    pub from: Option<OrderStatus>,
    pub to: OrderStatus,
    pub actor_id: String,
    pub occurred_at: DateTime<Utc>,
}

pub trait OrderNotifier: Send + Sync {
    fn notify(&self, notification: OrderNotification);
}

/// Drops every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl OrderNotifier for NoopNotifier {
    fn notify(&self, _notification: OrderNotification) {}
}

/// Queues notifications on an unbounded channel for a background consumer
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<OrderNotification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OrderNotification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl OrderNotifier for ChannelNotifier {
    fn notify(&self, notification: OrderNotification) {
        let event_name = notification.event_name.clone();
        if self.sender.send(notification).is_err() {
            debug!(event_name = %event_name, "notification receiver dropped, discarding");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> OrderNotification {
        OrderNotification {
            event_name: "order.status_changed".to_string(),
            order_id: Uuid::nil(),
            order_number: "DS241201001".to_string(),
            user: "cust-1".to_string(),
            from: Some(OrderStatus::PendingApproval),
            to: OrderStatus::Quoted,
            actor_id: "admin-1".to_string(),
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_channel_notifier_delivers() {
        let (notifier, mut receiver) = ChannelNotifier::new();
        notifier.notify(notification());
        let received = receiver.recv().await.unwrap();
        assert_eq!(received.to, OrderStatus::Quoted);
    }

    #[test]
    fn test_channel_notifier_ignores_closed_receiver() {
        let (notifier, receiver) = ChannelNotifier::new();
        drop(receiver);
        notifier.notify(notification());
        NoopNotifier.notify(notification());
    }
}

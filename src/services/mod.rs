pub mod notifier;
pub mod repository;
pub mod workflow_service;

pub use notifier::{ChannelNotifier, NoopNotifier, OrderNotification, OrderNotifier};
pub use repository::{InMemoryOrderRepository, OrderRepository, StoredOrder};
pub use workflow_service::{ItemProgress, OrderView, OrderWorkflowService};

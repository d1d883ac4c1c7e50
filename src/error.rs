use crate::models::PaymentStatus;
use crate::state_machine::{ActionKey, OrderStatus};
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Error kinds produced by the order workflow engine and its collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Invalid status transition from {from} to {to} (valid next states: {})", format_states(.valid_next_states))]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
        valid_next_states: Vec<OrderStatus>,
    },

    #[error("Actor {actor_id} is not authorized to perform {action}")]
    Unauthorized { actor_id: String, action: ActionKey },

    #[error("Order in status {status} with payment {payment_status} cannot be cancelled")]
    NonCancellable {
        status: OrderStatus,
        payment_status: PaymentStatus,
    },

    #[error("Cash payment does not reconcile: {}", .errors.join("; "))]
    PaymentMismatch { errors: Vec<String> },

    #[error("Order number {order_number} is already taken")]
    AllocationConflict { order_number: String },

    #[error("Action {action} is not available while order is {status}: {reason}")]
    ActionUnavailable {
        action: ActionKey,
        status: OrderStatus,
        reason: String,
    },

    #[error("Daily order sequence exhausted for {date}")]
    SequenceExhausted { date: NaiveDate },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Order {order_id} not found")]
    OrderNotFound { order_id: Uuid },

    #[error("Order {order_id} was modified concurrently (expected version {expected_version}, found {actual_version})")]
    ConcurrentModification {
        order_id: Uuid,
        expected_version: u64,
        actual_version: u64,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WorkflowError {
    /// Whether the caller should retry the whole operation against a fresh snapshot
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AllocationConflict { .. } | Self::ConcurrentModification { .. }
        )
    }

    /// Stable machine-readable kind, used by request handlers for status mapping
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Unauthorized { .. } => "unauthorized",
            Self::NonCancellable { .. } => "non_cancellable",
            Self::PaymentMismatch { .. } => "payment_mismatch",
            Self::AllocationConflict { .. } => "allocation_conflict",
            Self::ActionUnavailable { .. } => "action_unavailable",
            Self::SequenceExhausted { .. } => "sequence_exhausted",
            Self::InvalidInput(_) => "invalid_input",
            Self::OrderNotFound { .. } => "order_not_found",
            Self::ConcurrentModification { .. } => "concurrent_modification",
            Self::Configuration(_) => "configuration",
        }
    }
}

fn format_states(states: &[OrderStatus]) -> String {
    if states.is_empty() {
        return "none".to_string();
    }
    states
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Helper function to create input validation errors
pub fn invalid_input(msg: impl Into<String>) -> WorkflowError {
    WorkflowError::InvalidInput(msg.into())
}

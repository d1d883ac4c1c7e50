// Order lifecycle state machine
//
// Pure, synchronous workflow logic: role-scoped transition table, cancellation
// and photo guards, action derivation, and event application over an order
// snapshot supplied by the caller.

pub mod actions;
pub mod events;
pub mod guards;
pub mod order_state_machine;
pub mod states;
pub mod transitions;

// Re-export main types for convenient access
pub use actions::{ActionAudience, ActionAuthorizer, ActionKey};
pub use events::{OrderEvent, QuoteProposal};
pub use order_state_machine::{OrderStateMachine, Transition};
pub use states::OrderStatus;
pub use transitions::{StatusTransitionTable, TransitionAuthority};

// Common traits and utilities
pub use guards::{CancellationPolicy, OrderGuard, PhotoApprovalGuard};

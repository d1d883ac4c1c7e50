#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Order Workflow
//!
//! Order lifecycle engine for a custom-sublimation storefront.
//!
//! ## Overview
//!
//! Every order moves through a fixed status graph, from submission for
//! quoting to completion or cancellation. This crate decides what may happen
//! to an order next: which status changes are legal for a role, which actions
//! an actor is offered, whether an order can still be cancelled, and how cash
//! handed over at delivery reconciles with the order total.
//!
//! The engine itself is pure and synchronous. It reads an [`models::Order`]
//! snapshot supplied by the caller and proposes the next snapshot; nothing is
//! persisted and nothing is logged until the [`services`] layer takes over.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - Status graph, guards, action derivation and event application
//! - [`production`] - Per-item production stage progress
//! - [`payment`] - Cash-on-delivery reconciliation
//! - [`numbering`] - Daily sequential order numbers
//! - [`timeline`] - Merged status and production history
//! - [`services`] - Repository, notifier and the async workflow service
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use order_workflow::config::WorkflowConfig;
//! use order_workflow::models::{Actor, Role};
//! use order_workflow::services::{InMemoryOrderRepository, NoopNotifier, OrderWorkflowService};
//! use order_workflow::state_machine::{OrderEvent, QuoteProposal};
//! use std::sync::Arc;
//!
//! # async fn example(draft: order_workflow::models::NewOrder) -> order_workflow::Result<()> {
//! let service = OrderWorkflowService::new(
//!     Arc::new(InMemoryOrderRepository::new()),
//!     Arc::new(NoopNotifier),
//!     WorkflowConfig::from_env()?,
//! )?;
//!
//! let customer = Actor::new("cust-1", Role::Customer);
//! let order = service.create_order(draft, &customer).await?;
//!
//! let admin = Actor::new("admin-1", Role::Admin);
//! let quote = QuoteProposal {
//!     subtotal: 40.0,
//!     delivery_fee: 5.0,
//!     tax: 0.0,
//!     discounts: 0.0,
//!     estimated_days: Some(4),
//!     notes: None,
//! };
//! service.execute(order.id, &admin, OrderEvent::SubmitQuote(quote)).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod numbering;
pub mod payment;
pub mod production;
pub mod services;
pub mod state_machine;
pub mod timeline;

#[cfg(test)]
mod test_utils;

pub use config::WorkflowConfig;
pub use error::{Result, WorkflowError};
pub use models::{Actor, NewOrder, Order, Role};
pub use numbering::OrderNumberAllocator;
pub use payment::{CashPaymentData, CashPaymentReconciler, CashReconciliation};
pub use production::{ProductionStage, ProductionStageTracker, StageProgress};
pub use services::{OrderWorkflowService, OrderView};
pub use state_machine::{
    ActionAuthorizer, ActionKey, CancellationPolicy, OrderEvent, OrderStateMachine, OrderStatus,
    StatusTransitionTable,
};
pub use timeline::{OrderTimelineBuilder, TimelineEntry};

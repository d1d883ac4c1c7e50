//! # System Constants
//!
//! Fixed vocabulary of the order workflow: order-number format, the canonical
//! production stage order, status groupings and notification event names.

use crate::models::Role;
use crate::production::ProductionStage;
use crate::state_machine::OrderStatus;

/// Default prefix of every human-readable order number
pub const ORDER_NUMBER_PREFIX: &str = "DS";

/// Width of the zero-padded daily sequence suffix
pub const ORDER_SEQUENCE_WIDTH: usize = 3;

/// Highest sequence number representable in the suffix
pub const MAX_DAILY_SEQUENCE: u32 = 999;

/// Currency rounding tolerance for cash change reconciliation
pub const CASH_CHANGE_TOLERANCE: f64 = 0.01;

/// Canonical production order for every order item
pub const PRODUCTION_STAGE_ORDER: [ProductionStage; 6] = [
    ProductionStage::SourcingProduct,
    ProductionStage::PreparingMaterials,
    ProductionStage::Printing,
    ProductionStage::Sublimating,
    ProductionStage::QualityCheck,
    ProductionStage::Packaging,
];

/// Roles allowed to drive the staff side of the workflow
pub const STAFF_ROLES: [Role; 2] = [Role::Admin, Role::Manager];

/// Accepted review rating range (inclusive)
pub const MIN_REVIEW_RATING: u8 = 1;
pub const MAX_REVIEW_RATING: u8 = 5;

/// Status groupings used by guards and views
pub mod status_groups {
    use super::OrderStatus;

    /// Statuses from which the customer-facing cancellation path is open
    pub const CANCELLABLE_STATUSES: [OrderStatus; 3] = [
        OrderStatus::PendingApproval,
        OrderStatus::Quoted,
        OrderStatus::Approved,
    ];

    /// Statuses in which staff may record production work and photos
    pub const PRODUCTION_STATUSES: [OrderStatus; 2] =
        [OrderStatus::Approved, OrderStatus::InProduction];

    /// Final resting states
    pub const TERMINAL_STATUSES: [OrderStatus; 2] =
        [OrderStatus::Completed, OrderStatus::Cancelled];
}

/// Notification event names handed to the notification collaborator
pub mod events {
    pub const ORDER_CREATED: &str = "order.created";
    pub const ORDER_STATUS_CHANGED: &str = "order.status_changed";
    pub const ORDER_PHOTO_UPLOADED: &str = "order.photo_uploaded";
}

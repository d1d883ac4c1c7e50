use crate::constants::status_groups;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle states
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Design submitted, waiting for staff to quote it
    #[default]
    PendingApproval,
    /// Staff proposed a price; waiting on the customer
    Quoted,
    /// Customer accepted the quote
    Approved,
    /// Quote or order rejected
    Rejected,
    /// Items are being manufactured
    InProduction,
    ReadyForDelivery,
    Delivered,
    /// Customer acknowledged delivery
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Check if this is a terminal state (only the reactivation path leads out)
    pub fn is_terminal(&self) -> bool {
        status_groups::TERMINAL_STATUSES.contains(self)
    }

    /// Check if staff may record production work in this state
    pub fn is_production(&self) -> bool {
        status_groups::PRODUCTION_STATUSES.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Quoted => "quoted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::InProduction => "in_production",
            Self::ReadyForDelivery => "ready_for_delivery",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable title used by timelines
    pub fn label(&self) -> &'static str {
        match self {
            Self::PendingApproval => "Order submitted for approval",
            Self::Quoted => "Quote sent",
            Self::Approved => "Quote approved",
            Self::Rejected => "Order rejected",
            Self::InProduction => "Production started",
            Self::ReadyForDelivery => "Ready for delivery",
            Self::Delivered => "Order delivered",
            Self::Completed => "Order completed",
            Self::Cancelled => "Order cancelled",
        }
    }

    pub fn all() -> &'static [OrderStatus] {
        &[
            Self::PendingApproval,
            Self::Quoted,
            Self::Approved,
            Self::Rejected,
            Self::InProduction,
            Self::ReadyForDelivery,
            Self::Delivered,
            Self::Completed,
            Self::Cancelled,
        ]
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Invalid order status: {s}"))
    }
}

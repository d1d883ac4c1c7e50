//! # Order Model
//!
//! The order aggregate: everything the workflow engine reads and mutates for
//! a single customer purchase, from quote request through delivery.
//!
//! ## Overview
//!
//! - **Explicit status**: the lifecycle position is always the tagged
//!   [`OrderStatus`], never inferred from which fields are populated.
//! - **Append-only history**: `status_history` only grows; every status change
//!   records who made it and under which role.
//! - **Exclusive delivery**: [`Delivery`] carries either an address or meetup
//!   details, never both.
//!
//! Persistence is the caller's concern. Snapshots arrive and leave as plain
//! serde-serializable values.

use crate::error::{invalid_input, Result};
use crate::models::{Actor, Role};
use crate::production::ProductionStageMap;
use crate::state_machine::OrderStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Human-readable identifier, immutable once assigned
    pub order_number: String,
    /// Owning customer
    pub user: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub payment: Payment,
    #[serde(default)]
    pub production_photos: Vec<ProductionPhoto>,
    pub delivery: Delivery,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discounts: f64,
    /// Authoritative charge
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub quote: Option<Quote>,
    #[serde(default)]
    pub staff_notes: Vec<StaffNote>,
    #[serde(default)]
    pub review: Option<Review>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build a freshly submitted order in `pending_approval`
    pub fn new_pending(
        id: Uuid,
        order_number: impl Into<String>,
        draft: NewOrder,
        created_by: &Actor,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        draft.validate()?;

        let subtotal: f64 = draft.items.iter().map(OrderItem::line_total).sum();
        ensure_amount("subtotal", subtotal)?;
        let mut order = Self {
            id,
            order_number: order_number.into(),
            user: draft.user,
            status: OrderStatus::PendingApproval,
            status_history: Vec::new(),
            items: draft.items,
            payment: Payment::new(draft.payment_method, draft.payment_timing),
            production_photos: Vec::new(),
            delivery: draft.delivery,
            subtotal,
            delivery_fee: 0.0,
            tax: 0.0,
            discounts: 0.0,
            total: subtotal,
            quote: None,
            staff_notes: Vec::new(),
            review: None,
            cancellation_reason: None,
            created_at: now,
        };
        order.record_status(
            OrderStatus::PendingApproval,
            created_by,
            Some("Design submitted for quoting".to_string()),
            now,
        );
        Ok(order)
    }

    pub fn is_owned_by(&self, actor_id: &str) -> bool {
        self.user == actor_id
    }

    /// Whether any production photo still awaits the customer's response
    pub fn has_pending_photos(&self) -> bool {
        self.production_photos
            .iter()
            .any(|photo| photo.client_response.is_none())
    }

    pub fn is_paid(&self) -> bool {
        self.payment.status == PaymentStatus::Paid
    }

    /// Set the status and append the matching history record
    pub(crate) fn record_status(
        &mut self,
        status: OrderStatus,
        actor: &Actor,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.status = status;
        self.status_history.push(StatusHistoryEntry {
            status,
            timestamp: at,
            changed_by: actor.id.clone(),
            changed_by_role: actor.role,
            notes,
        });
    }
}

/// One append-only status history record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub changed_by: String,
    pub changed_by_role: Role,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub design_id: Option<String>,
    #[serde(default)]
    pub production_stages: ProductionStageMap,
}

impl OrderItem {
    pub fn new(product_name: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            unit_price,
            design_id: None,
            production_stages: ProductionStageMap::new(),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Wompi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTiming {
    #[default]
    OnDelivery,
    Advance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub timing: PaymentTiming,
    #[serde(default)]
    pub cash: Option<CashRecord>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    pub fn new(method: PaymentMethod, timing: PaymentTiming) -> Self {
        Self {
            method,
            status: PaymentStatus::Pending,
            timing,
            cash: None,
            paid_at: None,
        }
    }
}

/// Cash actually handed over at registration time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashRecord {
    pub cash_received: f64,
    pub change_given: f64,
    pub registered_by: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPhoto {
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub client_response: Option<ClientResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub approved: bool,
    #[serde(default)]
    pub feedback: Option<String>,
    pub responded_at: DateTime<Utc>,
}

/// Fulfilment mode; address and meetup details are mutually exclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "delivery_type", rename_all = "snake_case")]
pub enum Delivery {
    Delivery { address: DeliveryAddress },
    Meetup { details: MeetupDetails },
}

impl Delivery {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Delivery { .. } => "delivery",
            Self::Meetup { .. } => "meetup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetupDetails {
    pub location: String,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Price staff proposed for a pending order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub discounts: f64,
    pub total: f64,
    #[serde(default)]
    pub estimated_days: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
    pub quoted_by: String,
    pub quoted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffNote {
    pub note: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an order from a submitted design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user: String,
    pub items: Vec<OrderItem>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_timing: PaymentTiming,
    pub delivery: Delivery,
}

impl NewOrder {
    pub fn validate(&self) -> Result<()> {
        if self.user.trim().is_empty() {
            return Err(invalid_input("Order must belong to a customer"));
        }
        if self.items.is_empty() {
            return Err(invalid_input("Order must contain at least one item"));
        }
        for item in &self.items {
            if item.quantity == 0 {
                return Err(invalid_input(format!(
                    "Item '{}' must have a positive quantity",
                    item.product_name
                )));
            }
            ensure_amount("unit_price", item.unit_price)?;
        }
        Ok(())
    }
}

/// Monetary amounts must be finite and non-negative
pub fn ensure_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid_input(format!(
            "{field} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}

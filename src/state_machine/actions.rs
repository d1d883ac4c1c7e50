use super::guards::{CancellationPolicy, PhotoApprovalGuard};
use super::states::OrderStatus;
use crate::models::{Actor, Order};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Every action an actor can be offered on an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    // Owner actions
    AcceptQuote,
    RejectQuote,
    ApprovePhotos,
    MarkCompleted,
    LeaveReview,

    // Owner or staff
    CancelOrder,

    // Staff actions
    SubmitQuote,
    RejectOrder,
    UpdateProduction,
    UploadPhoto,
    MarkDelivered,
    RegisterPayment,
    ConfirmPayment,
    UpdateStatus,
    AddNotes,

    // Request-level checks, never offered as available actions
    CreateOrder,
    ViewOrder,
}

/// Who an action is meant for, independent of order state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionAudience {
    Owner,
    Staff,
    OwnerOrStaff,
}

impl ActionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AcceptQuote => "accept_quote",
            Self::RejectQuote => "reject_quote",
            Self::ApprovePhotos => "approve_photos",
            Self::MarkCompleted => "mark_completed",
            Self::LeaveReview => "leave_review",
            Self::CancelOrder => "cancel_order",
            Self::SubmitQuote => "submit_quote",
            Self::RejectOrder => "reject_order",
            Self::UpdateProduction => "update_production",
            Self::UploadPhoto => "upload_photo",
            Self::MarkDelivered => "mark_delivered",
            Self::RegisterPayment => "register_payment",
            Self::ConfirmPayment => "confirm_payment",
            Self::UpdateStatus => "update_status",
            Self::AddNotes => "add_notes",
            Self::CreateOrder => "create_order",
            Self::ViewOrder => "view_order",
        }
    }

    pub fn audience(&self) -> ActionAudience {
        match self {
            Self::AcceptQuote
            | Self::RejectQuote
            | Self::ApprovePhotos
            | Self::MarkCompleted
            | Self::LeaveReview => ActionAudience::Owner,
            Self::CancelOrder | Self::CreateOrder | Self::ViewOrder => {
                ActionAudience::OwnerOrStaff
            }
            Self::SubmitQuote
            | Self::RejectOrder
            | Self::UpdateProduction
            | Self::UploadPhoto
            | Self::MarkDelivered
            | Self::RegisterPayment
            | Self::ConfirmPayment
            | Self::UpdateStatus
            | Self::AddNotes => ActionAudience::Staff,
        }
    }

    pub fn is_staff_only(&self) -> bool {
        self.audience() == ActionAudience::Staff
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derives the actions an actor may perform on an order snapshot.
///
/// Ownership and staff role are independent axes: an owner who also holds a
/// staff role gets both sets, a customer never sees staff actions.
pub struct ActionAuthorizer;

impl ActionAuthorizer {
    pub fn available_actions(order: &Order, actor: &Actor) -> BTreeSet<ActionKey> {
        let mut actions = BTreeSet::new();

        if order.is_owned_by(&actor.id) {
            Self::owner_actions(order, &mut actions);
        }
        if actor.is_staff() {
            Self::staff_actions(order, &mut actions);
        }

        actions
    }

    /// Whether the actor could ever perform the action on this order, ignoring state
    pub fn in_audience(order: &Order, actor: &Actor, action: ActionKey) -> bool {
        let is_owner = order.is_owned_by(&actor.id);
        match action.audience() {
            ActionAudience::Owner => is_owner,
            ActionAudience::Staff => actor.is_staff(),
            ActionAudience::OwnerOrStaff => is_owner || actor.is_staff(),
        }
    }

    fn owner_actions(order: &Order, actions: &mut BTreeSet<ActionKey>) {
        if order.status == OrderStatus::Quoted {
            actions.insert(ActionKey::AcceptQuote);
            actions.insert(ActionKey::RejectQuote);
        }
        if PhotoApprovalGuard::awaiting_response(order) {
            actions.insert(ActionKey::ApprovePhotos);
        }
        if CancellationPolicy::can_cancel(order) {
            actions.insert(ActionKey::CancelOrder);
        }
        if order.status == OrderStatus::Delivered {
            actions.insert(ActionKey::MarkCompleted);
        }
        if order.status == OrderStatus::Completed && order.review.is_none() {
            actions.insert(ActionKey::LeaveReview);
        }
    }

    fn staff_actions(order: &Order, actions: &mut BTreeSet<ActionKey>) {
        match order.status {
            OrderStatus::PendingApproval => {
                actions.insert(ActionKey::SubmitQuote);
                actions.insert(ActionKey::RejectOrder);
            }
            OrderStatus::Approved | OrderStatus::InProduction => {
                actions.insert(ActionKey::UpdateProduction);
                actions.insert(ActionKey::UploadPhoto);
            }
            OrderStatus::ReadyForDelivery => {
                actions.insert(ActionKey::MarkDelivered);
            }
            _ => {}
        }
        if !order.is_paid() {
            actions.insert(ActionKey::RegisterPayment);
            actions.insert(ActionKey::ConfirmPayment);
        }
        if CancellationPolicy::can_cancel(order) || order.status == OrderStatus::Approved {
            actions.insert(ActionKey::CancelOrder);
        }
        actions.insert(ActionKey::UpdateStatus);
        actions.insert(ActionKey::AddNotes);
    }
}

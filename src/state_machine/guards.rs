use crate::constants::status_groups::CANCELLABLE_STATUSES;
use crate::error::{Result, WorkflowError};
use crate::models::Order;

/// Trait for implementing order guards
pub trait OrderGuard {
    /// Check if the guarded operation is allowed on this snapshot
    fn check(&self, order: &Order) -> Result<()>;

    /// Get a description of this guard for diagnostics
    fn description(&self) -> &'static str;
}

/// Decides whether an order may still be cancelled through the regular path.
///
/// Production and settled payments are not revocable here; those need an
/// out-of-band remediation.
pub struct CancellationPolicy;

impl CancellationPolicy {
    pub fn can_cancel(order: &Order) -> bool {
        CANCELLABLE_STATUSES.contains(&order.status) && !order.is_paid()
    }
}

impl OrderGuard for CancellationPolicy {
    fn check(&self, order: &Order) -> Result<()> {
        if Self::can_cancel(order) {
            Ok(())
        } else {
            Err(WorkflowError::NonCancellable {
                status: order.status,
                payment_status: order.payment.status,
            })
        }
    }

    fn description(&self) -> &'static str {
        "Order must be pending, quoted or approved and not yet paid"
    }
}

/// Guard for the customer's quality-photo response
pub struct PhotoApprovalGuard;

impl PhotoApprovalGuard {
    /// Whether any uploaded production photo still awaits the owner's answer
    pub fn awaiting_response(order: &Order) -> bool {
        order.has_pending_photos()
    }
}

impl OrderGuard for PhotoApprovalGuard {
    fn check(&self, order: &Order) -> Result<()> {
        if Self::awaiting_response(order) {
            Ok(())
        } else {
            Err(WorkflowError::ActionUnavailable {
                action: super::ActionKey::ApprovePhotos,
                status: order.status,
                reason: "no production photos are awaiting a response".to_string(),
            })
        }
    }

    fn description(&self) -> &'static str {
        "At least one production photo must be awaiting the customer's response"
    }
}

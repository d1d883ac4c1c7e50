//! # Test Utilities
//!
//! Shared snapshot builders for unit tests.

use crate::models::{
    Actor, Delivery, MeetupDetails, NewOrder, Order, OrderItem, PaymentMethod, PaymentTiming,
    Role,
};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

/// Customer id owning [`sample_order`]
pub const SAMPLE_OWNER: &str = "cust-42";

/// A freshly submitted, unpaid cash order with one item
pub fn sample_order() -> Order {
    let created_at = Utc.with_ymd_and_hms(2024, 12, 1, 14, 0, 0).unwrap();
    let draft = NewOrder {
        user: SAMPLE_OWNER.to_string(),
        items: vec![OrderItem::new("Sublimated mug", 1, 15.5)],
        payment_method: PaymentMethod::Cash,
        payment_timing: PaymentTiming::OnDelivery,
        delivery: Delivery::Meetup {
            details: MeetupDetails {
                location: "Centro Comercial Oviedo".to_string(),
                scheduled_at: None,
                notes: None,
            },
        },
    };
    Order::new_pending(
        Uuid::nil(),
        "DS241201001",
        draft,
        &Actor::new(SAMPLE_OWNER, Role::Customer),
        created_at,
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::OrderStatus;

    #[test]
    fn test_sample_order_shape() {
        let order = sample_order();
        assert_eq!(order.status, OrderStatus::PendingApproval);
        assert_eq!(order.user, SAMPLE_OWNER);
        assert_eq!(order.total, 15.5);
    }
}

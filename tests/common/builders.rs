//! Test data builders for order workflow integration tests

#![allow(dead_code)] // Not every test binary uses every builder

use chrono::{DateTime, TimeZone, Utc};
use order_workflow::models::{
    Actor, Delivery, DeliveryAddress, MeetupDetails, NewOrder, Order, OrderItem, PaymentMethod,
    PaymentStatus, PaymentTiming, Role,
};
use order_workflow::state_machine::{OrderEvent, OrderStatus, QuoteProposal};
use uuid::Uuid;

pub const OWNER_ID: &str = "cust-100";

pub fn owner() -> Actor {
    Actor::new(OWNER_ID, Role::Customer)
}

pub fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin)
}

pub fn manager() -> Actor {
    Actor::new("manager-1", Role::Manager)
}

pub fn employee() -> Actor {
    Actor::new("emp-1", Role::Employee)
}

/// 2024-12-01 09:00 in the storefront's UTC-5 calendar
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 1, 14, 0, 0).unwrap()
}

pub fn quote_event(subtotal: f64, delivery_fee: f64) -> OrderEvent {
    OrderEvent::SubmitQuote(QuoteProposal {
        subtotal,
        delivery_fee,
        tax: 0.0,
        discounts: 0.0,
        estimated_days: Some(5),
        notes: Some("Full-color sublimation".to_string()),
    })
}

/// Builder pattern for order drafts submitted by customers
pub struct NewOrderBuilder {
    user: String,
    items: Vec<OrderItem>,
    payment_method: PaymentMethod,
    delivery: Delivery,
}

impl NewOrderBuilder {
    pub fn new() -> Self {
        Self {
            user: OWNER_ID.to_string(),
            items: vec![OrderItem::new("Sublimated mug", 2, 18.0)],
            payment_method: PaymentMethod::Cash,
            delivery: Delivery::Meetup {
                details: MeetupDetails {
                    location: "Parque Lleras".to_string(),
                    scheduled_at: None,
                    notes: None,
                },
            },
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    pub fn with_item(mut self, product_name: &str, quantity: u32, unit_price: f64) -> Self {
        self.items.push(OrderItem::new(product_name, quantity, unit_price));
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_home_delivery(mut self) -> Self {
        self.delivery = Delivery::Delivery {
            address: DeliveryAddress {
                street: "Calle 10 #43-12".to_string(),
                city: "Medellín".to_string(),
                department: Some("Antioquia".to_string()),
                instructions: None,
            },
        };
        self
    }

    pub fn build(self) -> NewOrder {
        NewOrder {
            user: self.user,
            items: self.items,
            payment_method: self.payment_method,
            payment_timing: PaymentTiming::OnDelivery,
            delivery: self.delivery,
        }
    }
}

/// Builder pattern for order snapshots in an arbitrary lifecycle position
pub struct OrderBuilder {
    draft: NewOrderBuilder,
    order_number: String,
    status: OrderStatus,
    payment_status: PaymentStatus,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self {
            draft: NewOrderBuilder::new(),
            order_number: "DS241201001".to_string(),
            status: OrderStatus::PendingApproval,
            payment_status: PaymentStatus::Pending,
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_payment_status(mut self, payment_status: PaymentStatus) -> Self {
        self.payment_status = payment_status;
        self
    }

    pub fn with_draft(mut self, draft: NewOrderBuilder) -> Self {
        self.draft = draft;
        self
    }

    pub fn build(self) -> Order {
        let mut order = Order::new_pending(
            Uuid::new_v4(),
            self.order_number,
            self.draft.build(),
            &owner(),
            base_time(),
        )
        .expect("Failed to build test order");
        order.status = self.status;
        order.payment.status = self.payment_status;
        order
    }
}

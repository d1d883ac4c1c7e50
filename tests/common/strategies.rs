#![allow(dead_code)]

use order_workflow::models::{Actor, PaymentStatus, Role};
use order_workflow::production::{ProductionStage, ProductionStageMap, StageProgress};
use order_workflow::state_machine::OrderStatus;
use proptest::prelude::*;

use super::builders::{OrderBuilder, OWNER_ID};

/// Strategy for generating any lifecycle status
pub fn status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::all().to_vec())
}

pub fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::Customer),
        Just(Role::Employee),
        Just(Role::Manager),
        Just(Role::Admin),
    ]
}

pub fn payment_status_strategy() -> impl Strategy<Value = PaymentStatus> {
    prop_oneof![
        Just(PaymentStatus::Pending),
        Just(PaymentStatus::Paid),
        Just(PaymentStatus::Failed),
    ]
}

/// Strategy for actors that may or may not own the built order
pub fn actor_strategy() -> impl Strategy<Value = Actor> {
    (role_strategy(), prop::bool::ANY).prop_map(|(role, is_owner)| {
        let id = if is_owner { OWNER_ID } else { "someone-else" };
        Actor::new(id, role)
    })
}

/// Strategy for orders in any status and payment state
pub fn order_strategy() -> impl Strategy<Value = order_workflow::Order> {
    (status_strategy(), payment_status_strategy()).prop_map(|(status, payment_status)| {
        OrderBuilder::new()
            .with_status(status)
            .with_payment_status(payment_status)
            .build()
    })
}

/// Strategy for stage maps with arbitrary subsets present and completed
pub fn stage_map_strategy() -> impl Strategy<Value = ProductionStageMap> {
    prop::collection::vec(prop::option::of(prop::bool::ANY), 6).prop_map(|flags| {
        ProductionStage::all()
            .iter()
            .zip(flags)
            .filter_map(|(stage, flag)| {
                flag.map(|completed| {
                    (
                        *stage,
                        StageProgress {
                            completed,
                            ..StageProgress::default()
                        },
                    )
                })
            })
            .collect()
    })
}

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use order_workflow::models::{
    Actor, Delivery, MeetupDetails, NewOrder, Order, OrderItem, PaymentMethod, PaymentTiming, Role,
};
use order_workflow::state_machine::{ActionAuthorizer, OrderEvent, OrderStateMachine, QuoteProposal};
use order_workflow::OrderTimelineBuilder;
use uuid::Uuid;

fn pending_order() -> Order {
    let draft = NewOrder {
        user: "cust-1".to_string(),
        items: vec![
            OrderItem::new("Sublimated mug", 2, 18.0),
            OrderItem::new("Custom t-shirt", 1, 30.0),
        ],
        payment_method: PaymentMethod::Cash,
        payment_timing: PaymentTiming::OnDelivery,
        delivery: Delivery::Meetup {
            details: MeetupDetails {
                location: "Parque Lleras".to_string(),
                scheduled_at: None,
                notes: None,
            },
        },
    };
    let created_at = Utc.with_ymd_and_hms(2024, 12, 1, 14, 0, 0).unwrap();
    Order::new_pending(Uuid::nil(), "DS241201001", draft, &Actor::new("cust-1", Role::Customer), created_at)
        .unwrap()
}

fn benchmark_available_actions(c: &mut Criterion) {
    let order = pending_order();
    let owner = Actor::new("cust-1", Role::Customer);
    let admin = Actor::new("admin-1", Role::Admin);

    c.bench_function("available_actions_owner", |b| {
        b.iter(|| ActionAuthorizer::available_actions(black_box(&order), black_box(&owner)))
    });
    c.bench_function("available_actions_staff", |b| {
        b.iter(|| ActionAuthorizer::available_actions(black_box(&order), black_box(&admin)))
    });
}

fn benchmark_apply_quote(c: &mut Criterion) {
    let order = pending_order();
    let admin = Actor::new("admin-1", Role::Admin);
    let machine = OrderStateMachine::default();
    let now = Utc::now();
    let event = OrderEvent::SubmitQuote(QuoteProposal {
        subtotal: 66.0,
        delivery_fee: 5.0,
        tax: 0.0,
        discounts: 0.0,
        estimated_days: Some(4),
        notes: None,
    });

    c.bench_function("apply_submit_quote", |b| {
        b.iter(|| machine.apply(black_box(&order), &admin, event.clone(), now))
    });
    c.bench_function("build_timeline", |b| {
        b.iter(|| OrderTimelineBuilder::build_timeline(black_box(&order)))
    });
}

criterion_group!(benches, benchmark_available_actions, benchmark_apply_quote);
criterion_main!(benches);

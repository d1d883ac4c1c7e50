//! # Order Workflow Service
//!
//! Wires the pure engine to its collaborators: load a snapshot, let the state
//! machine propose the next one, persist it with a version check, then notify.
//! Order creation allocates the daily order number and retries when the store
//! reports a number collision.

use super::notifier::{OrderNotification, OrderNotifier};
use super::repository::OrderRepository;
use crate::config::WorkflowConfig;
use crate::constants::events;
use crate::error::{Result, WorkflowError};
use crate::logging::{log_order_operation, log_order_rejection};
use crate::models::{Actor, NewOrder, Order, Role};
use crate::numbering::{day_window, local_date, OrderNumberAllocator};
use crate::payment::CashPaymentReconciler;
use crate::production::{ProductionStage, ProductionStageTracker};
use crate::state_machine::{
    ActionKey, OrderEvent, OrderStateMachine, OrderStatus, StatusTransitionTable,
};
use crate::timeline::{OrderTimelineBuilder, TimelineEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Derived per-item production view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemProgress {
    pub product_name: String,
    pub progress: u8,
    pub next_stage: Option<ProductionStage>,
    pub completed_stages: Vec<ProductionStage>,
}

/// Everything a request handler needs to render one order for one actor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub order: Order,
    pub items: Vec<ItemProgress>,
    pub available_actions: BTreeSet<ActionKey>,
    pub legal_next_states: BTreeSet<OrderStatus>,
    pub timeline: Vec<TimelineEntry>,
}

pub struct OrderWorkflowService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    machine: OrderStateMachine,
    allocator: OrderNumberAllocator,
    config: WorkflowConfig,
}

impl<R, N> OrderWorkflowService<R, N>
where
    R: OrderRepository,
    N: OrderNotifier,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: WorkflowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            repository,
            notifier,
            machine: OrderStateMachine::new(CashPaymentReconciler::new(config.cash_tolerance)),
            allocator: OrderNumberAllocator::new(config.order_number_prefix.clone()),
            config,
        })
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub async fn create_order(&self, draft: NewOrder, actor: &Actor) -> Result<Order> {
        self.create_order_at(draft, actor, Utc::now()).await
    }

    /// Create an order in `pending_approval`, retrying number allocation on conflict
    pub async fn create_order_at(
        &self,
        draft: NewOrder,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        // Customers order for themselves; staff may order on a customer's behalf
        let may_create = actor.is_staff() || (actor.role == Role::Customer && draft.user == actor.id);
        if !may_create {
            let err = WorkflowError::Unauthorized {
                actor_id: actor.id.clone(),
                action: ActionKey::CreateOrder,
            };
            log_order_rejection("create_order", None, &actor.id, err.kind(), &err.to_string());
            return Err(err);
        }
        draft.validate()?;
        let date = local_date(now, self.config.utc_offset_minutes)?;
        let (start, end) = day_window(date, self.config.utc_offset_minutes)?;

        let mut attempt = 1;
        loop {
            let existing = self.repository.order_numbers_between(start, end).await?;
            let order_number = self.allocator.allocate(date, &existing)?;
            let order = Order::new_pending(Uuid::new_v4(), order_number, draft.clone(), actor, now)?;

            match self.repository.insert(order).await {
                Ok(stored) => {
                    let order = stored.order;
                    log_order_operation(
                        "create_order",
                        order.id,
                        &order.order_number,
                        &actor.id,
                        order.status.as_str(),
                        None,
                    );
                    self.dispatch(events::ORDER_CREATED, &order, None, actor, now);
                    return Ok(order);
                }
                Err(WorkflowError::AllocationConflict { order_number })
                    if attempt < self.config.max_allocation_attempts =>
                {
                    warn!(
                        order_number = %order_number,
                        attempt = attempt,
                        "order number taken, allocating again"
                    );
                    attempt += 1;
                }
                Err(err) => {
                    log_order_rejection("create_order", None, &actor.id, err.kind(), &err.to_string());
                    return Err(err);
                }
            }
        }
    }

    pub async fn execute(&self, order_id: Uuid, actor: &Actor, event: OrderEvent) -> Result<Order> {
        self.execute_at(order_id, actor, event, Utc::now()).await
    }

    /// Apply an event to the stored order and persist the proposed snapshot
    pub async fn execute_at(
        &self,
        order_id: Uuid,
        actor: &Actor,
        event: OrderEvent,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        let stored = self.repository.fetch(order_id).await?;
        let event_type = event.event_type();

        let transition = match self.machine.apply(&stored.order, actor, event, now) {
            Ok(transition) => transition,
            Err(err) => {
                log_order_rejection(event_type, Some(order_id), &actor.id, err.kind(), &err.to_string());
                return Err(err);
            }
        };

        let notification_event = transition.notification_event();
        let from = transition.from;
        let persisted = self
            .repository
            .replace(transition.order, stored.version)
            .await?
            .order;

        log_order_operation(
            event_type,
            persisted.id,
            &persisted.order_number,
            &actor.id,
            persisted.status.as_str(),
            None,
        );
        if let Some(event_name) = notification_event {
            self.dispatch(event_name, &persisted, Some(from), actor, now);
        }
        Ok(persisted)
    }

    pub async fn available_actions(&self, order_id: Uuid, actor: &Actor) -> Result<BTreeSet<ActionKey>> {
        let stored = self.repository.fetch(order_id).await?;
        Ok(self.machine.available_actions(&stored.order, actor))
    }

    /// Read-side projection of an order for one actor
    pub async fn view(&self, order_id: Uuid, actor: &Actor) -> Result<OrderView> {
        let order = self.repository.fetch(order_id).await?.order;

        // Customers only see their own orders; employees read everything
        if actor.role == Role::Customer && !order.is_owned_by(&actor.id) {
            return Err(WorkflowError::Unauthorized {
                actor_id: actor.id.clone(),
                action: ActionKey::ViewOrder,
            });
        }
        let available_actions = self.machine.available_actions(&order, actor);

        let items = order
            .items
            .iter()
            .map(|item| {
                let stages = Some(&item.production_stages);
                ItemProgress {
                    product_name: item.product_name.clone(),
                    progress: ProductionStageTracker::progress(stages),
                    next_stage: ProductionStageTracker::next_pending_stage(stages),
                    completed_stages: ProductionStageTracker::completed_stages(stages),
                }
            })
            .collect();

        Ok(OrderView {
            legal_next_states: StatusTransitionTable::legal_next_states(order.status, actor.role),
            timeline: OrderTimelineBuilder::build_timeline(&order),
            items,
            available_actions,
            order,
        })
    }

    fn dispatch(
        &self,
        event_name: &str,
        order: &Order,
        from: Option<OrderStatus>,
        actor: &Actor,
        now: DateTime<Utc>,
    ) {
        if !self.config.notifications_enabled {
            debug!(event_name = %event_name, "notifications disabled, skipping");
            return;
        }
        self.notifier.notify(OrderNotification {
            event_name: event_name.to_string(),
            order_id: order.id,
            order_number: order.order_number.clone(),
            user: order.user.clone(),
            from,
            to: order.status,
            actor_id: actor.id.clone(),
            occurred_at: now,
        });
    }
}

use super::{
    actions::{ActionAuthorizer, ActionKey},
    events::{OrderEvent, QuoteProposal},
    guards::{CancellationPolicy, OrderGuard, PhotoApprovalGuard},
    states::OrderStatus,
    transitions::StatusTransitionTable,
};
use crate::constants::{events, MAX_REVIEW_RATING, MIN_REVIEW_RATING};
use crate::error::{invalid_input, Result, WorkflowError};
use crate::models::{
    ensure_amount, Actor, CashRecord, ClientResponse, Order, PaymentMethod, PaymentStatus,
    ProductionPhoto, Quote, Review, Role, StaffNote,
};
use crate::payment::{CashPaymentData, CashPaymentReconciler};
use crate::production::ProductionStage;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Result of applying one event: the proposed next snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub order: Order,
    pub action: ActionKey,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl Transition {
    pub fn status_changed(&self) -> bool {
        self.from != self.to
    }

    /// Event name the notification collaborator should hear about, if any
    pub fn notification_event(&self) -> Option<&'static str> {
        if self.status_changed() {
            Some(events::ORDER_STATUS_CHANGED)
        } else if self.action == ActionKey::UploadPhoto {
            Some(events::ORDER_PHOTO_UPLOADED)
        } else {
            None
        }
    }
}

/// Pure order lifecycle state machine.
///
/// Takes an immutable snapshot and returns a new one; never performs I/O and
/// never logs. Write serialization is the caller's responsibility.
#[derive(Default)]
pub struct OrderStateMachine {
    reconciler: CashPaymentReconciler,
}

impl OrderStateMachine {
    pub fn new(reconciler: CashPaymentReconciler) -> Self {
        Self { reconciler }
    }

    pub fn available_actions(&self, order: &Order, actor: &Actor) -> BTreeSet<ActionKey> {
        ActionAuthorizer::available_actions(order, actor)
    }

    /// Apply an event on behalf of an actor
    pub fn apply(
        &self,
        order: &Order,
        actor: &Actor,
        event: OrderEvent,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let action = event.action();
        if !ActionAuthorizer::in_audience(order, actor, action) {
            return Err(WorkflowError::Unauthorized {
                actor_id: actor.id.clone(),
                action,
            });
        }

        let from = order.status;
        let mut next = order.clone();

        match event {
            OrderEvent::SubmitQuote(proposal) => {
                Self::submit_quote(&mut next, actor, proposal, now)?;
            }
            OrderEvent::RejectOrder { reason } => {
                Self::expect_status(&next, actor, OrderStatus::PendingApproval, OrderStatus::Rejected)?;
                Self::change_status(&mut next, actor, actor.role, OrderStatus::Rejected, reason, now)?;
            }
            OrderEvent::AcceptQuote => {
                // Quote response path: owners move their own quote forward
                Self::expect_status(&next, actor, OrderStatus::Quoted, OrderStatus::Approved)?;
                next.record_status(
                    OrderStatus::Approved,
                    actor,
                    Some("Quote accepted by customer".to_string()),
                    now,
                );
            }
            OrderEvent::RejectQuote { feedback } => {
                Self::change_status(&mut next, actor, Role::Customer, OrderStatus::Rejected, feedback, now)?;
            }
            OrderEvent::UpdateProduction {
                item_index,
                stage,
                completed,
                notes,
                photo_url,
            } => {
                Self::update_production(
                    &mut next, actor, item_index, stage, completed, notes, photo_url, now,
                )?;
            }
            OrderEvent::UploadPhoto { url, notes } => {
                Self::expect_production(&next, action)?;
                if url.trim().is_empty() {
                    return Err(invalid_input("Photo URL must not be empty"));
                }
                next.production_photos.push(ProductionPhoto {
                    url,
                    uploaded_at: now,
                    notes,
                    client_response: None,
                });
            }
            OrderEvent::RespondToPhotos { approved, feedback } => {
                PhotoApprovalGuard.check(&next)?;
                for photo in next
                    .production_photos
                    .iter_mut()
                    .filter(|photo| photo.client_response.is_none())
                {
                    photo.client_response = Some(ClientResponse {
                        approved,
                        feedback: feedback.clone(),
                        responded_at: now,
                    });
                }
            }
            OrderEvent::MarkDelivered { notes } => {
                Self::expect_status(&next, actor, OrderStatus::ReadyForDelivery, OrderStatus::Delivered)?;
                Self::change_status(&mut next, actor, actor.role, OrderStatus::Delivered, notes, now)?;
            }
            OrderEvent::MarkCompleted => {
                Self::change_status(
                    &mut next,
                    actor,
                    Role::Customer,
                    OrderStatus::Completed,
                    Some("Delivery confirmed by customer".to_string()),
                    now,
                )?;
            }
            OrderEvent::CancelOrder { reason } => {
                CancellationPolicy.check(&next)?;
                next.cancellation_reason = reason.clone();
                next.record_status(OrderStatus::Cancelled, actor, reason, now);
            }
            OrderEvent::RegisterPayment { method, cash } => {
                self.register_payment(&mut next, actor, method, cash, now)?;
            }
            OrderEvent::ConfirmPayment => {
                // Settles without a cash record; cash counted at the door goes through RegisterPayment
                Self::expect_unpaid(&next, action)?;
                Self::mark_paid(&mut next, now);
            }
            OrderEvent::UpdateStatus { status, notes } => {
                if status == OrderStatus::Cancelled && next.is_paid() {
                    return Err(WorkflowError::NonCancellable {
                        status: next.status,
                        payment_status: next.payment.status,
                    });
                }
                Self::change_status(&mut next, actor, actor.role, status, notes, now)?;
                if from == OrderStatus::Cancelled && status == OrderStatus::PendingApproval {
                    // Reactivation leaves production and payment data untouched
                    next.cancellation_reason = None;
                } else if status == OrderStatus::Cancelled {
                    next.cancellation_reason = next
                        .status_history
                        .last()
                        .and_then(|record| record.notes.clone());
                }
            }
            OrderEvent::AddNote { note } => {
                if note.trim().is_empty() {
                    return Err(invalid_input("Note must not be empty"));
                }
                next.staff_notes.push(StaffNote {
                    note,
                    author: actor.id.clone(),
                    created_at: now,
                });
            }
            OrderEvent::LeaveReview { rating, comment } => {
                if next.status != OrderStatus::Completed || next.review.is_some() {
                    return Err(WorkflowError::ActionUnavailable {
                        action,
                        status: next.status,
                        reason: "reviews are left once, after completion".to_string(),
                    });
                }
                if !(MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
                    return Err(invalid_input(format!(
                        "Rating must be between {MIN_REVIEW_RATING} and {MAX_REVIEW_RATING}, got {rating}"
                    )));
                }
                next.review = Some(Review {
                    rating,
                    comment,
                    created_at: now,
                });
            }
        }

        Ok(Transition {
            to: next.status,
            order: next,
            action,
            from,
        })
    }

    fn submit_quote(
        order: &mut Order,
        actor: &Actor,
        proposal: QuoteProposal,
        now: DateTime<Utc>,
    ) -> Result<()> {
        Self::expect_status(order, actor, OrderStatus::PendingApproval, OrderStatus::Quoted)?;
        ensure_amount("subtotal", proposal.subtotal)?;
        ensure_amount("delivery_fee", proposal.delivery_fee)?;
        ensure_amount("tax", proposal.tax)?;
        ensure_amount("discounts", proposal.discounts)?;
        let total = proposal.total();
        if total < 0.0 {
            return Err(invalid_input(format!(
                "Discounts exceed the quoted amount (total {total:.2})"
            )));
        }
        ensure_amount("total", total)?;

        order.subtotal = proposal.subtotal;
        order.delivery_fee = proposal.delivery_fee;
        order.tax = proposal.tax;
        order.discounts = proposal.discounts;
        order.total = total;
        order.quote = Some(Quote {
            subtotal: proposal.subtotal,
            delivery_fee: proposal.delivery_fee,
            tax: proposal.tax,
            discounts: proposal.discounts,
            total,
            estimated_days: proposal.estimated_days,
            notes: proposal.notes.clone(),
            quoted_by: actor.id.clone(),
            quoted_at: now,
        });
        Self::change_status(order, actor, actor.role, OrderStatus::Quoted, proposal.notes, now)
    }

    #[allow(clippy::too_many_arguments)]
    fn update_production(
        order: &mut Order,
        actor: &Actor,
        item_index: usize,
        stage: ProductionStage,
        completed: bool,
        notes: Option<String>,
        photo_url: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        Self::expect_production(order, ActionKey::UpdateProduction)?;
        let item_count = order.items.len();
        let item = order.items.get_mut(item_index).ok_or_else(|| {
            invalid_input(format!(
                "Item index {item_index} out of range (order has {item_count} items)"
            ))
        })?;

        let progress = item.production_stages.entry(stage).or_default();
        progress.completed = completed;
        progress.completed_at = completed.then_some(now);
        if notes.is_some() {
            progress.notes = notes;
        }
        if photo_url.is_some() {
            progress.photo_url = photo_url;
        }

        if order.status == OrderStatus::Approved {
            Self::change_status(
                order,
                actor,
                actor.role,
                OrderStatus::InProduction,
                Some(format!("Production started: {}", stage.label())),
                now,
            )?;
        }
        Ok(())
    }

    fn register_payment(
        &self,
        order: &mut Order,
        actor: &Actor,
        method: PaymentMethod,
        cash: Option<CashPaymentData>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        Self::expect_unpaid(order, ActionKey::RegisterPayment)?;

        match (method, cash) {
            (PaymentMethod::Cash, Some(cash)) => {
                let change = self.reconciler.reconcile(&cash, order.total).into_result()?;
                order.payment.cash = Some(CashRecord {
                    cash_received: cash.cash_received,
                    change_given: change,
                    registered_by: actor.id.clone(),
                    registered_at: now,
                });
            }
            (PaymentMethod::Cash, None) => {
                return Err(invalid_input("Cash payments require the cash received"));
            }
            (_, Some(_)) => {
                return Err(invalid_input("Cash details only apply to cash payments"));
            }
            (_, None) => {}
        }

        order.payment.method = method;
        Self::mark_paid(order, now);
        Ok(())
    }

    fn mark_paid(order: &mut Order, now: DateTime<Utc>) {
        order.payment.status = PaymentStatus::Paid;
        order.payment.paid_at = Some(now);
    }

    /// Validate against the table side for `authority` and record the change
    fn change_status(
        order: &mut Order,
        actor: &Actor,
        authority: Role,
        target: OrderStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        StatusTransitionTable::validate(order.status, target, &actor.id, authority)?;
        order.record_status(target, actor, notes, now);
        Ok(())
    }

    fn expect_status(
        order: &Order,
        actor: &Actor,
        expected: OrderStatus,
        target: OrderStatus,
    ) -> Result<()> {
        if order.status == expected {
            return Ok(());
        }
        Err(WorkflowError::InvalidTransition {
            from: order.status,
            to: target,
            valid_next_states: StatusTransitionTable::legal_next_states(order.status, actor.role)
                .into_iter()
                .collect(),
        })
    }

    fn expect_production(order: &Order, action: ActionKey) -> Result<()> {
        if order.status.is_production() {
            return Ok(());
        }
        Err(WorkflowError::ActionUnavailable {
            action,
            status: order.status,
            reason: "production work is only recorded while approved or in production"
                .to_string(),
        })
    }

    fn expect_unpaid(order: &Order, action: ActionKey) -> Result<()> {
        if !order.is_paid() {
            return Ok(());
        }
        Err(WorkflowError::ActionUnavailable {
            action,
            status: order.status,
            reason: "payment is already settled".to_string(),
        })
    }
}

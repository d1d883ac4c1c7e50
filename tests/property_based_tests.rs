mod common;

use common::strategies::*;
use common::builders::*;
use order_workflow::production::ProductionStageTracker;
use order_workflow::state_machine::{
    ActionAuthorizer, ActionKey, CancellationPolicy, OrderEvent, OrderStateMachine, OrderStatus,
    StatusTransitionTable, TransitionAuthority,
};
use order_workflow::{models::PaymentStatus, Role, WorkflowError};
use proptest::prelude::*;

proptest! {
    /// Property: a change on another role's side of the table is an authorization
    /// failure, a change on nobody's side is an invalid transition
    #[test]
    fn transition_failures_are_never_conflated(
        current in status_strategy(),
        target in status_strategy(),
        role in role_strategy(),
    ) {
        let result = StatusTransitionTable::validate(current, target, "actor-1", role);
        let granted_elsewhere = [Role::Customer, Role::Admin].iter().any(|other| {
            TransitionAuthority::for_role(*other) != TransitionAuthority::for_role(role)
                && StatusTransitionTable::is_legal(current, target, *other)
        });

        if StatusTransitionTable::is_legal(current, target, role) {
            prop_assert!(result.is_ok());
        } else if granted_elsewhere {
            prop_assert_eq!(
                result,
                Err(WorkflowError::Unauthorized {
                    actor_id: "actor-1".to_string(),
                    action: ActionKey::UpdateStatus,
                })
            );
        } else {
            let valid_next_states: Vec<OrderStatus> =
                StatusTransitionTable::legal_next_states(current, role).into_iter().collect();
            prop_assert_eq!(
                result,
                Err(WorkflowError::InvalidTransition { from: current, to: target, valid_next_states })
            );
        }
    }

    /// Property: a state with no legal target for a role has an empty next-state set
    #[test]
    fn legal_next_states_match_the_table(current in status_strategy(), role in role_strategy()) {
        let any_legal = OrderStatus::all()
            .iter()
            .any(|target| StatusTransitionTable::is_legal(current, *target, role));
        let next_states = StatusTransitionTable::legal_next_states(current, role);
        prop_assert_eq!(next_states.is_empty(), !any_legal);
        prop_assert!(next_states.iter().all(|target| StatusTransitionTable::is_legal(current, *target, role)));
    }

    /// Property: a paid order can never be cancelled, by any route
    #[test]
    fn paid_orders_are_never_cancellable(status in status_strategy()) {
        let order = OrderBuilder::new()
            .with_status(status)
            .with_payment_status(PaymentStatus::Paid)
            .build();
        prop_assert!(!CancellationPolicy::can_cancel(&order));

        let machine = OrderStateMachine::default();
        let cancel = machine.apply(&order, &admin(), OrderEvent::CancelOrder { reason: None }, base_time());
        let is_non_cancellable = matches!(cancel, Err(WorkflowError::NonCancellable { .. }));
        prop_assert!(is_non_cancellable);

        let forced = machine.apply(
            &order,
            &admin(),
            OrderEvent::UpdateStatus { status: OrderStatus::Cancelled, notes: None },
            base_time(),
        );
        prop_assert!(forced.is_err());
    }

    /// Property: deriving actions has no side effects and repeats exactly
    #[test]
    fn available_actions_are_idempotent(order in order_strategy(), actor in actor_strategy()) {
        let before = order.clone();
        let first = ActionAuthorizer::available_actions(&order, &actor);
        let second = ActionAuthorizer::available_actions(&order, &actor);
        prop_assert_eq!(first, second);
        prop_assert_eq!(order, before);
    }

    /// Property: non-staff roles never see staff-only actions
    #[test]
    fn customers_never_see_staff_actions(order in order_strategy(), actor in actor_strategy()) {
        prop_assume!(!actor.role.is_staff());
        let actions = ActionAuthorizer::available_actions(&order, &actor);
        prop_assert!(actions.iter().all(|action| !action.is_staff_only()));
        if actor.role == Role::Employee && !order.is_owned_by(&actor.id) {
            prop_assert!(actions.is_empty());
        }
    }

    /// Property: progress is a bounded percentage and the next stage is never a completed one
    #[test]
    fn stage_progress_is_consistent(stages in stage_map_strategy()) {
        let progress = ProductionStageTracker::progress(Some(&stages));
        prop_assert!(progress <= 100);
        prop_assert_eq!(progress, ProductionStageTracker::progress(Some(&stages)));

        if let Some(next) = ProductionStageTracker::next_pending_stage(Some(&stages)) {
            prop_assert!(stages.get(&next).map_or(true, |stage| !stage.completed));
        }
        let completed = ProductionStageTracker::completed_stages(Some(&stages));
        prop_assert!(completed.iter().all(|stage| stages[stage].completed));
    }
}

use super::actions::ActionKey;
use super::states::OrderStatus;
use crate::error::{Result, WorkflowError};
use crate::models::Role;
use std::collections::BTreeSet;

/// Which side of the transition table a role may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionAuthority {
    Customer,
    Staff,
}

impl TransitionAuthority {
    /// Employees hold read access only and map to no authority
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Customer => Some(Self::Customer),
            Role::Admin | Role::Manager => Some(Self::Staff),
            Role::Employee => None,
        }
    }

    fn next_states(&self, current: OrderStatus) -> &'static [OrderStatus] {
        use OrderStatus::*;

        match self {
            Self::Customer => match current {
                Quoted => &[Rejected],
                Delivered => &[Completed],
                _ => &[],
            },
            Self::Staff => match current {
                PendingApproval => &[Quoted, Rejected, Cancelled],
                Quoted => &[Approved, Rejected, Cancelled],
                Rejected => &[PendingApproval],
                Approved => &[InProduction, Cancelled],
                InProduction => &[ReadyForDelivery, Cancelled],
                ReadyForDelivery => &[Delivered, Cancelled],
                Delivered => &[Completed],
                // Reactivation escape hatch
                Cancelled => &[PendingApproval],
                Completed => &[],
            },
        }
    }
}

/// Role-scoped table of legal status changes
pub struct StatusTransitionTable;

impl StatusTransitionTable {
    /// Legal next states for the role in the current state; empty when none exist
    pub fn legal_next_states(current: OrderStatus, role: Role) -> BTreeSet<OrderStatus> {
        TransitionAuthority::for_role(role)
            .map(|authority| authority.next_states(current).iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_legal(current: OrderStatus, target: OrderStatus, role: Role) -> bool {
        TransitionAuthority::for_role(role)
            .is_some_and(|authority| authority.next_states(current).contains(&target))
    }

    /// Validate a requested status change for the actor.
    ///
    /// A change that exists in the table for some other authority is an
    /// authorization failure; a change that exists for nobody is an invalid
    /// transition.
    pub fn validate(
        current: OrderStatus,
        target: OrderStatus,
        actor_id: &str,
        role: Role,
    ) -> Result<()> {
        if Self::is_legal(current, target, role) {
            return Ok(());
        }

        let granted_elsewhere = [TransitionAuthority::Customer, TransitionAuthority::Staff]
            .iter()
            .filter(|authority| Some(**authority) != TransitionAuthority::for_role(role))
            .any(|authority| authority.next_states(current).contains(&target));

        if granted_elsewhere {
            return Err(WorkflowError::Unauthorized {
                actor_id: actor_id.to_string(),
                action: ActionKey::UpdateStatus,
            });
        }

        Err(WorkflowError::InvalidTransition {
            from: current,
            to: target,
            valid_next_states: Self::legal_next_states(current, role).into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_customer_transitions() {
        assert_eq!(
            StatusTransitionTable::legal_next_states(Quoted, Role::Customer),
            BTreeSet::from([Rejected])
        );
        assert_eq!(
            StatusTransitionTable::legal_next_states(Delivered, Role::Customer),
            BTreeSet::from([Completed])
        );
        assert!(StatusTransitionTable::legal_next_states(PendingApproval, Role::Customer).is_empty());
    }

    #[test]
    fn test_staff_transitions() {
        assert_eq!(
            StatusTransitionTable::legal_next_states(Quoted, Role::Admin),
            BTreeSet::from([Approved, Rejected, Cancelled])
        );
        assert_eq!(
            StatusTransitionTable::legal_next_states(Cancelled, Role::Manager),
            BTreeSet::from([PendingApproval])
        );
        assert!(StatusTransitionTable::legal_next_states(Completed, Role::Admin).is_empty());
    }

    #[test]
    fn test_employee_has_no_transitions() {
        for status in OrderStatus::all() {
            assert!(StatusTransitionTable::legal_next_states(*status, Role::Employee).is_empty());
        }
    }

    #[test]
    fn test_staff_only_transition_by_customer_is_unauthorized() {
        let err =
            StatusTransitionTable::validate(PendingApproval, Quoted, "cust-1", Role::Customer)
                .unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { .. }));
    }

    #[test]
    fn test_transition_absent_from_every_table_is_invalid() {
        let err = StatusTransitionTable::validate(Completed, Cancelled, "admin-1", Role::Admin)
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                from: Completed,
                to: Cancelled,
                valid_next_states: vec![],
            }
        );

        let err = StatusTransitionTable::validate(Quoted, Delivered, "cust-1", Role::Customer)
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                from: Quoted,
                to: Delivered,
                valid_next_states: vec![Rejected],
            }
        );
    }

    #[test]
    fn test_employee_requests_follow_the_same_split() {
        let err = StatusTransitionTable::validate(PendingApproval, Quoted, "emp-1", Role::Employee)
            .unwrap_err();
        assert_eq!(err.kind(), "unauthorized");

        let err = StatusTransitionTable::validate(Completed, Cancelled, "emp-1", Role::Employee)
            .unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                from: Completed,
                to: Cancelled,
                valid_next_states: vec![],
            }
        );
    }

    #[test]
    fn test_customer_transition_validates() {
        assert!(StatusTransitionTable::validate(Delivered, Completed, "cust-1", Role::Customer).is_ok());
        assert!(StatusTransitionTable::validate(Delivered, Completed, "adm", Role::Admin).is_ok());
    }
}

//! # Cash Payment Reconciliation
//!
//! Validates the cash handed over for an order and derives the change due.
//! Mismatches are reported, never silently corrected.

use crate::constants::CASH_CHANGE_TOLERANCE;
use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};

/// Slack for binary floating point noise on top of the currency tolerance
const FLOAT_SLACK: f64 = 1e-9;

/// Cash figures supplied by staff when registering a cash payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashPaymentData {
    pub cash_received: f64,
    /// Amount due; falls back to the order total when absent
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub change_given: f64,
}

/// Outcome of a reconciliation, carrying every failed rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashReconciliation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub calculated_change: f64,
}

impl CashReconciliation {
    /// Convert into the calculated change, or a `PaymentMismatch` error
    pub fn into_result(self) -> Result<f64> {
        if self.valid {
            Ok(self.calculated_change)
        } else {
            Err(WorkflowError::PaymentMismatch {
                errors: self.errors,
            })
        }
    }
}

pub struct CashPaymentReconciler {
    tolerance: f64,
}

impl Default for CashPaymentReconciler {
    fn default() -> Self {
        Self::new(CASH_CHANGE_TOLERANCE)
    }
}

impl CashPaymentReconciler {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn reconcile(&self, cash: &CashPaymentData, order_total: f64) -> CashReconciliation {
        let mut errors = Vec::new();
        let expected = cash.total_amount.unwrap_or(order_total);

        if !cash.cash_received.is_finite() || cash.cash_received <= 0.0 {
            errors.push(format!(
                "cash_received must be a positive amount, got {}",
                cash.cash_received
            ));
        }
        if !expected.is_finite() || expected < 0.0 {
            errors.push(format!("amount due must be non-negative, got {expected}"));
        }
        if cash.cash_received < expected {
            errors.push(format!(
                "cash_received {:.2} is less than the amount due {:.2}",
                cash.cash_received, expected
            ));
        }
        if !cash.change_given.is_finite() || cash.change_given < 0.0 {
            errors.push(format!(
                "change_given must be non-negative, got {}",
                cash.change_given
            ));
        }

        let calculated_change = round_to_cents((cash.cash_received - expected).max(0.0));
        if (cash.change_given - calculated_change).abs() > self.tolerance + FLOAT_SLACK {
            errors.push(format!(
                "change_given {:.2} does not match calculated change {:.2}",
                cash.change_given, calculated_change
            ));
        }

        CashReconciliation {
            valid: errors.is_empty(),
            errors,
            calculated_change,
        }
    }
}

fn round_to_cents(amount: f64) -> f64 {
    if amount.is_finite() {
        (amount * 100.0).round() / 100.0
    } else {
        0.0
    }
}

use super::actions::ActionKey;
use super::states::OrderStatus;
use crate::models::PaymentMethod;
use crate::payment::CashPaymentData;
use crate::production::ProductionStage;
use serde::{Deserialize, Serialize};

/// Quote figures proposed by staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteProposal {
    pub subtotal: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discounts: f64,
    #[serde(default)]
    pub estimated_days: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl QuoteProposal {
    pub fn total(&self) -> f64 {
        self.subtotal + self.delivery_fee + self.tax - self.discounts
    }
}

/// Events that mutate an order, one per workflow action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum OrderEvent {
    SubmitQuote(QuoteProposal),
    RejectOrder {
        reason: Option<String>,
    },
    AcceptQuote,
    RejectQuote {
        feedback: Option<String>,
    },
    UpdateProduction {
        item_index: usize,
        stage: ProductionStage,
        completed: bool,
        notes: Option<String>,
        photo_url: Option<String>,
    },
    UploadPhoto {
        url: String,
        notes: Option<String>,
    },
    /// Answer every production photo still awaiting a response
    RespondToPhotos {
        approved: bool,
        feedback: Option<String>,
    },
    MarkDelivered {
        notes: Option<String>,
    },
    MarkCompleted,
    CancelOrder {
        reason: Option<String>,
    },
    RegisterPayment {
        method: PaymentMethod,
        cash: Option<CashPaymentData>,
    },
    ConfirmPayment,
    UpdateStatus {
        status: OrderStatus,
        notes: Option<String>,
    },
    AddNote {
        note: String,
    },
    LeaveReview {
        rating: u8,
        comment: Option<String>,
    },
}

impl OrderEvent {
    /// Action the actor must be granted to apply this event
    pub fn action(&self) -> ActionKey {
        match self {
            Self::SubmitQuote(_) => ActionKey::SubmitQuote,
            Self::RejectOrder { .. } => ActionKey::RejectOrder,
            Self::AcceptQuote => ActionKey::AcceptQuote,
            Self::RejectQuote { .. } => ActionKey::RejectQuote,
            Self::UpdateProduction { .. } => ActionKey::UpdateProduction,
            Self::UploadPhoto { .. } => ActionKey::UploadPhoto,
            Self::RespondToPhotos { .. } => ActionKey::ApprovePhotos,
            Self::MarkDelivered { .. } => ActionKey::MarkDelivered,
            Self::MarkCompleted => ActionKey::MarkCompleted,
            Self::CancelOrder { .. } => ActionKey::CancelOrder,
            Self::RegisterPayment { .. } => ActionKey::RegisterPayment,
            Self::ConfirmPayment => ActionKey::ConfirmPayment,
            Self::UpdateStatus { .. } => ActionKey::UpdateStatus,
            Self::AddNote { .. } => ActionKey::AddNotes,
            Self::LeaveReview { .. } => ActionKey::LeaveReview,
        }
    }

    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        self.action().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_total() {
        let quote = QuoteProposal {
            subtotal: 100.0,
            delivery_fee: 8.0,
            tax: 19.0,
            discounts: 10.0,
            estimated_days: Some(5),
            notes: None,
        };
        assert_eq!(quote.total(), 117.0);
    }

    #[test]
    fn test_event_serde_shape() {
        let event = OrderEvent::UpdateStatus {
            status: OrderStatus::ReadyForDelivery,
            notes: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "update_status");
        assert_eq!(json["data"]["status"], "ready_for_delivery");

        let parsed: OrderEvent =
            serde_json::from_str(r#"{"type":"mark_completed"}"#).unwrap();
        assert_eq!(parsed, OrderEvent::MarkCompleted);
    }

    #[test]
    fn test_event_action_mapping() {
        assert_eq!(
            OrderEvent::RespondToPhotos {
                approved: true,
                feedback: None
            }
            .action(),
            ActionKey::ApprovePhotos
        );
        assert_eq!(OrderEvent::AcceptQuote.event_type(), "accept_quote");
    }
}

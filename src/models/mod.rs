pub mod actor;
pub mod order;

// Re-export models for easy access
pub use actor::{Actor, Role};
pub use order::{
    ensure_amount, CashRecord, ClientResponse, Delivery, DeliveryAddress, MeetupDetails,
    NewOrder, Order, OrderItem, Payment, PaymentMethod, PaymentStatus, PaymentTiming,
    ProductionPhoto, Quote, Review, StaffNote, StatusHistoryEntry,
};

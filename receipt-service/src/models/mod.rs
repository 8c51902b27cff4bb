//! Domain models for receipt-service.

mod citation;
mod payment;
mod receipt;
mod violation;

pub use citation::Citation;
pub use payment::{Payment, PaymentCategory, PaymentMethod, PaymentRecord};
pub use receipt::{ReceiptDocument, ReceiptLine};
pub use violation::{ViolationOccurrence, ViolationTypeTariff};

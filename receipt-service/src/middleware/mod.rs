pub mod capability;

pub use capability::{CapabilityPolicy, PaymentViewer};

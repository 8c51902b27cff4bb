//! Citation-to-receipt pipeline.
//!
//! `ReceiptAggregator` reads a payment and its violations, resolves fines and
//! spells the total; `ReceiptRenderer` places the result on the fixed form.

pub mod aggregator;
pub mod dates;
pub mod error;
pub mod fines;
pub mod layout;
pub mod renderer;
pub mod words;

pub use aggregator::{sanitize_receipt_number, ReceiptAggregator};
pub use error::ReceiptError;
pub use layout::{compose, Field, FixedLayout, PaintOp, REFERENCE_LAYOUT};
pub use renderer::{ReceiptRenderer, RenderError};

//! Receipt rendering.
//!
//! Every renderer turns an ordered batch of receipts into one document,
//! one receipt per page.

mod html;
mod layout;
#[cfg(feature = "native")]
mod pdf;

pub use html::HtmlRenderer;
pub use layout::{amount_phrase, ReceiptLayout};
#[cfg(feature = "native")]
pub use pdf::PdfRenderer;

use crate::error::RenderError;
use crate::models::receipt::ReceiptRecord;

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Trait for receipt document renderers.
pub trait ReceiptRenderer {
    /// Render all receipts, in order, into a single document.
    fn render(&self, receipts: &[ReceiptRecord]) -> Result<Vec<u8>>;

    /// File extension of the produced document.
    fn extension(&self) -> &'static str;
}

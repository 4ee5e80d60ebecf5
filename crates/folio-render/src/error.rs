//! # Render Error Types
//!
//! Anything that goes wrong after the invoice was loaded. Callers never see
//! a partial document: every path either returns complete bytes or one of
//! these.

use thiserror::Error;

/// Document generation failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A built-in font could not be registered with the document.
    #[error("Font unavailable: {0}")]
    Font(String),

    /// The computed layout does not fit on one page.
    #[error("Layout overflows the page: {0}")]
    Overflow(String),

    /// The PDF writer failed.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// The render thread panicked or was cancelled.
    #[error("Renderer aborted: {0}")]
    Panicked(String),
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

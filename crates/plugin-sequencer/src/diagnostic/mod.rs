//! Diagnostic types for error reporting.

mod error;
mod span;

pub use error::SequencerError;
pub use span::Span;

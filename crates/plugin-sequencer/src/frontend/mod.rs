//! Language frontends for introspecting generated client source.
//!
//! Each frontend is responsible for:
//! 1. Parsing one generated client in its language
//! 2. Reducing it to the list of public operations
//!
//! Generated clients are Python today; the trait keeps the pipeline
//! independent of that.

pub mod python;

use std::path::Path;
use crate::diagnostic::SequencerError;
use python::ast::OperationSignature;

/// Trait for language frontends.
pub trait Frontend {
    /// Returns the language name (e.g., "python").
    fn language(&self) -> &str;

    /// Parses the file at `path` and returns its public operations.
    fn introspect(&mut self, path: &Path) -> Result<Vec<OperationSignature>, SequencerError>;
}

/// Creates a frontend for the given language.
pub fn create_frontend(language: &str) -> Result<Box<dyn Frontend>, SequencerError> {
    match language {
        "python" | "py" => Ok(Box::new(python::PythonIntrospector::new()?)),
        _ => Err(SequencerError::UnsupportedLanguage {
            language: language.to_string(),
        }),
    }
}

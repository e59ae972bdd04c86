//! Python frontend: recovers the callable surface of a generated client.

pub mod ast;
pub mod parser;

use std::path::Path;

use crate::diagnostic::SequencerError;
use super::Frontend;
use ast::OperationSignature;
use parser::PythonParser;

/// Python frontend implementation.
pub struct PythonIntrospector {
    parser: PythonParser,
}

impl PythonIntrospector {
    /// Creates a new Python frontend.
    pub fn new() -> Result<Self, SequencerError> {
        Ok(Self {
            parser: PythonParser::new()?,
        })
    }

    /// Introspects source text that was read from `path`.
    pub fn introspect_source(
        &mut self,
        source: &str,
        path: &Path,
    ) -> Result<Vec<OperationSignature>, SequencerError> {
        Ok(self.parser.parse(source, path)?.operations)
    }
}

impl Frontend for PythonIntrospector {
    fn language(&self) -> &str {
        "python"
    }

    fn introspect(&mut self, path: &Path) -> Result<Vec<OperationSignature>, SequencerError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| SequencerError::io(path, e.to_string()))?;
        self.introspect_source(&source, path)
    }
}

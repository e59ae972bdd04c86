//! Python code generation for the sequence workspace.
//!
//! The client modules themselves come from the external generator. This
//! module only generates the aggregate files that tie them together:
//! - Index (`clients/__init__.py`) importing and instantiating every client
//! - Sequence (`sequence.py`) registering a pin map with every client
//!
//! Everything is rendered in memory first; nothing touches the disk until
//! [`GeneratedArtifacts::write`].

mod index;
mod sequence;
pub mod templates;

use std::path::PathBuf;

use tracing::info;

use crate::config::AliasStyle;
use crate::diagnostic::SequencerError;
use crate::frontend::python::ast::OperationSignature;
use crate::generator::GeneratedClient;
use crate::workspace::{write_atomic, WorkspaceLayout};
use templates::TemplateRenderer;

pub use index::generate_index;
pub use sequence::{generate_sequence, select_pin_map_operations};

/// Generated files, keyed by destination path.
#[derive(Debug)]
pub struct GeneratedArtifacts {
    pub files: Vec<(PathBuf, String)>,
}

impl GeneratedArtifacts {
    /// Writes every file atomically and returns the written paths.
    pub fn write(&self) -> Result<Vec<PathBuf>, SequencerError> {
        let mut written = Vec::with_capacity(self.files.len());
        for (path, content) in &self.files {
            write_atomic(path, content.as_bytes())?;
            info!(path = %path.display(), "wrote artifact");
            written.push(path.clone());
        }
        Ok(written)
    }
}

/// Renders the index module and the sequence script.
pub fn synthesize(
    clients: &[GeneratedClient],
    operations: &[OperationSignature],
    layout: &WorkspaceLayout,
    alias_style: AliasStyle,
    renderer: &dyn TemplateRenderer,
) -> Result<GeneratedArtifacts, SequencerError> {
    let index_code = generate_index(clients, alias_style);
    let sequence_code = generate_sequence(clients, operations, alias_style, renderer)?;

    Ok(GeneratedArtifacts {
        files: vec![
            (layout.index_file(), index_code),
            (layout.sequence_file(), sequence_code),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use templates::SequenceContext;
    use tempfile::TempDir;

    struct FailingRenderer;

    impl TemplateRenderer for FailingRenderer {
        fn render(&self, template: &str, _context: &SequenceContext) -> Result<String, SequencerError> {
            Err(SequencerError::TemplateRenderError {
                template: template.to_string(),
                message: "boom".to_string(),
            })
        }
    }

    fn client() -> GeneratedClient {
        GeneratedClient {
            service_class: "ni.examples.NIDmmMeasurement_Python".into(),
            module_name: "ni_dmm_measurement_client".into(),
            class_name: "NIDmmMeasurementClient".into(),
            file_path: "clients/ni_dmm_measurement_client.py".into(),
        }
    }

    #[test]
    fn render_failure_produces_nothing() {
        let dir = TempDir::new().unwrap();
        let layout = WorkspaceLayout::new(dir.path());

        let result = synthesize(&[client()], &[], &layout, AliasStyle::ModuleName, &FailingRenderer);

        assert!(matches!(result, Err(SequencerError::TemplateRenderError { .. })));
        assert!(!layout.index_file().exists());
        assert!(!layout.sequence_file().exists());
    }

    #[test]
    fn writes_index_and_sequence() {
        let dir = TempDir::new().unwrap();
        let layout = WorkspaceLayout::new(dir.path());
        std::fs::create_dir_all(layout.clients_dir()).unwrap();
        let renderer = templates::HandlebarsRenderer::new().unwrap();

        let artifacts =
            synthesize(&[client()], &[], &layout, AliasStyle::ModuleName, &renderer).unwrap();
        let written = artifacts.write().unwrap();

        assert_eq!(written, vec![layout.index_file(), layout.sequence_file()]);
        let index = std::fs::read_to_string(layout.index_file()).unwrap();
        assert!(index.contains("ni_dmm_measurement_client = NIDmmMeasurementClient()"));
        let sequence = std::fs::read_to_string(layout.sequence_file()).unwrap();
        assert!(sequence.starts_with("from clients import ni_dmm_measurement_client\n"));
    }
}

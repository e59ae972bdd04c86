//! Sequencer error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while building a sequence workspace.
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum SequencerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("File system error at '{}': {message}", path.display())]
    #[diagnostic(code(plugin_sequencer::io::file_system))]
    IoError {
        path: PathBuf,
        message: String,
    },

    #[error("Output directory '{}' is not usable: {reason}", path.display())]
    #[diagnostic(
        code(plugin_sequencer::io::invalid_output_directory),
        help("Pass an existing, writable directory")
    )]
    InvalidOutputDirectory {
        path: PathBuf,
        reason: String,
    },

    // =========================================================================
    // Discovery Errors
    // =========================================================================
    #[error("Discovery is unavailable: {message}")]
    #[diagnostic(
        code(plugin_sequencer::discovery::unavailable),
        help("Check that the measurement plug-in registration directory exists and is readable")
    )]
    DiscoveryUnavailable {
        message: String,
    },

    // =========================================================================
    // Naming Errors
    // =========================================================================
    #[error("Client creation failed for '{service_class}': '{base_name}' is not a valid identifier")]
    #[diagnostic(
        code(plugin_sequencer::naming::invalid_service_class),
        help("Update the measurement with a valid service class")
    )]
    InvalidServiceClass {
        service_class: String,
        base_name: String,
    },

    // =========================================================================
    // Generator Errors
    // =========================================================================
    #[error("Client generation failed for '{service_class}': {message}")]
    #[diagnostic(code(plugin_sequencer::generator::failed))]
    ExternalGeneratorFailure {
        service_class: String,
        message: String,
    },

    // =========================================================================
    // Parse Errors
    // =========================================================================
    #[error("Failed to initialize parser")]
    #[diagnostic(code(plugin_sequencer::parse::init_failed))]
    ParserInitFailed,

    #[error("Cannot parse '{}' at {line}:{column}: {message}", path.display())]
    #[diagnostic(
        code(plugin_sequencer::parse::unparsable_source),
        help("The generated client is not valid Python; regenerate it or check the generator version")
    )]
    UnparsableSource {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unsupported client language: {language}")]
    #[diagnostic(code(plugin_sequencer::frontend::unsupported_language))]
    UnsupportedLanguage {
        language: String,
    },

    // =========================================================================
    // Code Generation Errors
    // =========================================================================
    #[error("Failed to render template '{template}': {message}")]
    #[diagnostic(code(plugin_sequencer::codegen::template_render))]
    TemplateRenderError {
        template: String,
        message: String,
    },
}

impl SequencerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether the pipeline may skip the offending service and keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidServiceClass { .. })
    }
}

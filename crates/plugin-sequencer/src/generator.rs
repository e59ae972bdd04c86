//! Adapter around the external client generator.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::config::AliasStyle;
use crate::diagnostic::SequencerError;
use crate::naming::DerivedIdentifiers;
use crate::workspace::client_file_in;

/// Arguments for generating one client.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub service_class: String,
    pub output_dir: PathBuf,
    pub class_name: String,
    pub module_name: String,
}

impl GenerationRequest {
    pub fn new(service_class: &str, output_dir: &Path, ids: &DerivedIdentifiers) -> Self {
        Self {
            service_class: service_class.to_string(),
            output_dir: output_dir.to_path_buf(),
            class_name: ids.class_name.clone(),
            module_name: ids.module_name.clone(),
        }
    }

    /// Deterministic location of the generated module.
    pub fn output_file(&self) -> PathBuf {
        client_file_in(&self.output_dir, &self.module_name)
    }

    /// Short-option arguments understood by the client generator.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            format!("-s{}", self.service_class),
            format!("-o{}", self.output_dir.display()),
            format!("-c{}", self.class_name),
            format!("-m{}", self.module_name),
        ]
    }
}

/// A client module that exists on disk after generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClient {
    pub service_class: String,
    pub module_name: String,
    pub class_name: String,
    pub file_path: PathBuf,
}

impl GeneratedClient {
    /// Name bound to this client's instance in the index module.
    pub fn instance_alias(&self, style: AliasStyle) -> String {
        match style {
            AliasStyle::ModuleName => self.module_name.clone(),
            AliasStyle::LowercaseClass => self.class_name.to_lowercase(),
        }
    }
}

/// What happened to one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The client module was written to this path.
    Generated(PathBuf),
    /// The generator exited intentionally with a non-zero status.
    Skipped { code: i32 },
}

/// Emits a client module for one service.
pub trait ClientGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome, SequencerError>;
}

/// Runs the generator as a child process and waits for it.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: PathBuf,
}

impl CommandGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl ClientGenerator for CommandGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome, SequencerError> {
        let failure = |message: String| SequencerError::ExternalGeneratorFailure {
            service_class: request.service_class.clone(),
            message,
        };

        let output = Command::new(&self.program)
            .args(request.to_args())
            .output()
            .map_err(|e| failure(format!("cannot run '{}': {}", self.program.display(), e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            debug!(service_class = %request.service_class, "generator stdout: {}", stdout.trim());
        }

        match output.status.code() {
            Some(0) => {
                let path = request.output_file();
                if !path.is_file() {
                    return Err(failure(format!(
                        "generator succeeded but '{}' was not created",
                        path.display()
                    )));
                }
                Ok(GenerationOutcome::Generated(path))
            }
            Some(code) => {
                warn!(
                    service_class = %request.service_class,
                    code,
                    "generator exited without creating a client: {}",
                    stderr.trim()
                );
                Ok(GenerationOutcome::Skipped { code })
            }
            None => Err(failure(format!(
                "generator terminated by signal: {}",
                stderr.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::derive_identifiers;

    fn request() -> GenerationRequest {
        let ids = derive_identifiers("ni.examples.NIDmmMeasurement_Python").unwrap();
        GenerationRequest::new(
            "ni.examples.NIDmmMeasurement_Python",
            Path::new("/out/clients"),
            &ids,
        )
    }

    #[test]
    fn test_request_args() {
        assert_eq!(
            request().to_args(),
            vec![
                "-sni.examples.NIDmmMeasurement_Python",
                "-o/out/clients",
                "-cNIDmmMeasurementClient",
                "-mni_dmm_measurement_client",
            ]
        );
    }

    #[test]
    fn test_output_file_is_deterministic() {
        assert_eq!(
            request().output_file(),
            PathBuf::from("/out/clients/ni_dmm_measurement_client.py")
        );
    }

    #[test]
    fn test_instance_alias_styles() {
        let client = GeneratedClient {
            service_class: "ni.examples.NIDmmMeasurement_Python".into(),
            module_name: "ni_dmm_measurement_client".into(),
            class_name: "NIDmmMeasurementClient".into(),
            file_path: PathBuf::from("/out/clients/ni_dmm_measurement_client.py"),
        };
        assert_eq!(client.instance_alias(AliasStyle::ModuleName), "ni_dmm_measurement_client");
        assert_eq!(client.instance_alias(AliasStyle::LowercaseClass), "nidmmmeasurementclient");
    }

    #[test]
    fn test_missing_program_is_fatal() {
        let generator = CommandGenerator::new("/definitely/not/a/generator");
        let err = generator.generate(&request()).unwrap_err();
        assert!(matches!(err, SequencerError::ExternalGeneratorFailure { .. }));
        assert!(!err.is_recoverable());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_skip() {
        let generator = CommandGenerator::new("false");
        assert_eq!(
            generator.generate(&request()).unwrap(),
            GenerationOutcome::Skipped { code: 1 }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_success_without_file_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let ids = derive_identifiers("ni.examples.Foo_Python").unwrap();
        let request = GenerationRequest::new("ni.examples.Foo_Python", dir.path(), &ids);

        let err = CommandGenerator::new("true").generate(&request).unwrap_err();
        assert!(matches!(err, SequencerError::ExternalGeneratorFailure { .. }));
    }
}

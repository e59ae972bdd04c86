//! Pipeline orchestration.
//!
//! ```text
//! Idle → Discovering → Reconciling → Generating { index, total }*
//!      → Introspecting → Synthesizing → Done
//! ```
//!
//! Any phase may end in `Failed`. Per-service problems (an invalid service
//! class, a generator that declines, a module name already taken) skip that
//! service and the loop continues.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::codegen::{self, templates::{HandlebarsRenderer, TemplateRenderer}};
use crate::config::SequencerConfig;
use crate::diagnostic::SequencerError;
use crate::discovery::{Discovery, ServiceConfigDiscovery};
use crate::frontend::create_frontend;
use crate::frontend::python::ast::OperationSignature;
use crate::generator::{
    ClientGenerator, CommandGenerator, GeneratedClient, GenerationOutcome, GenerationRequest,
};
use crate::naming::derive_identifiers;
use crate::workspace::{reconcile, WorkspaceLayout};

/// Where a run currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Discovering,
    Reconciling,
    /// Generating the client for service `index` (0-based) of `total`.
    Generating { index: usize, total: usize },
    Introspecting,
    Synthesizing,
    Done,
    Failed(String),
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

/// A service that did not get a client, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedService {
    pub service_class: String,
    pub reason: String,
}

/// Result of a successful run.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Clients in discovery order.
    pub generated: Vec<GeneratedClient>,
    pub skipped: Vec<SkippedService>,
    /// Index and sequence paths, empty when no client was generated.
    pub written: Vec<PathBuf>,
}

/// Discover → reconcile → (derive → generate)* → introspect → synthesize.
pub struct Pipeline {
    config: SequencerConfig,
    layout: WorkspaceLayout,
    discovery: Box<dyn Discovery>,
    generator: Box<dyn ClientGenerator>,
    renderer: Box<dyn TemplateRenderer>,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(
        config: SequencerConfig,
        discovery: Box<dyn Discovery>,
        generator: Box<dyn ClientGenerator>,
        renderer: Box<dyn TemplateRenderer>,
    ) -> Self {
        let layout = WorkspaceLayout::new(config.output_dir.clone());
        Self {
            config,
            layout,
            discovery,
            generator,
            renderer,
            state: PipelineState::Idle,
        }
    }

    /// Pipeline backed by registration files, the generator executable and
    /// the built-in templates.
    pub fn from_config(config: SequencerConfig) -> Result<Self, SequencerError> {
        let discovery = ServiceConfigDiscovery::new(config.registry_dirs.clone());
        let generator = CommandGenerator::new(config.generator_program.clone());
        let renderer = HandlebarsRenderer::new()?;
        Ok(Self::new(
            config,
            Box::new(discovery),
            Box::new(generator),
            Box::new(renderer),
        ))
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// Runs one full generation cycle. Always starts from `Idle`.
    pub fn run(&mut self) -> Result<PipelineReport, SequencerError> {
        self.state = PipelineState::Idle;
        match self.run_phases() {
            Ok(report) => {
                self.transition(PipelineState::Done);
                Ok(report)
            }
            Err(e) => {
                self.transition(PipelineState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn run_phases(&mut self) -> Result<PipelineReport, SequencerError> {
        self.transition(PipelineState::Discovering);
        let services = self.discovery.enumerate_services(&self.config.interface)?;
        info!(count = services.len(), interface = %self.config.interface, "discovered services");

        self.transition(PipelineState::Reconciling);
        let reconciled = reconcile(&self.layout)?;
        info!(deleted = reconciled.deleted.len(), "cleaned output directory");

        let mut report = PipelineReport::default();
        let mut modules = HashSet::new();
        let clients_dir = self.layout.clients_dir();
        let total = services.len();

        for (index, service) in services.iter().enumerate() {
            self.transition(PipelineState::Generating { index, total });
            let service_class = service.service_class.as_str();

            let ids = match derive_identifiers(service_class) {
                Ok(ids) => ids,
                Err(e) if e.is_recoverable() => {
                    warn!(service_class, "{}", e);
                    report.skipped.push(SkippedService {
                        service_class: service_class.to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            if !modules.insert(ids.module_name.clone()) {
                warn!(service_class, module = %ids.module_name, "module name already generated");
                report.skipped.push(SkippedService {
                    service_class: service_class.to_string(),
                    reason: format!("module '{}' was already generated", ids.module_name),
                });
                continue;
            }

            let request = GenerationRequest::new(service_class, &clients_dir, &ids);
            match self.generator.generate(&request)? {
                GenerationOutcome::Generated(file_path) => {
                    info!(service_class, module = %ids.module_name, "generated client");
                    report.generated.push(GeneratedClient {
                        service_class: service_class.to_string(),
                        module_name: ids.module_name,
                        class_name: ids.class_name,
                        file_path,
                    });
                }
                GenerationOutcome::Skipped { code } => {
                    modules.remove(&ids.module_name);
                    report.skipped.push(SkippedService {
                        service_class: service_class.to_string(),
                        reason: format!("generator exited with status {}", code),
                    });
                }
            }
        }

        if report.generated.is_empty() {
            info!("no clients generated; skipping index and sequence");
            return Ok(report);
        }

        self.transition(PipelineState::Introspecting);
        let operations = self.introspect(&report.generated[0])?;

        self.transition(PipelineState::Synthesizing);
        let artifacts = codegen::synthesize(
            &report.generated,
            &operations,
            &self.layout,
            self.config.alias_style,
            self.renderer.as_ref(),
        )?;
        report.written = artifacts.write()?;

        Ok(report)
    }

    /// Every generated client shares one surface, so the first one stands in
    /// for all of them.
    fn introspect(&self, client: &GeneratedClient) -> Result<Vec<OperationSignature>, SequencerError> {
        let mut frontend = create_frontend("python")?;
        let operations = frontend.introspect(&client.file_path)?;
        debug!(
            file = %client.file_path.display(),
            operations = operations.len(),
            "introspected client"
        );
        Ok(operations)
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::StaticDiscovery;
    use tempfile::TempDir;

    struct UnavailableDiscovery;

    impl Discovery for UnavailableDiscovery {
        fn enumerate_services(&self, _: &str) -> Result<Vec<crate::discovery::ServiceDescriptor>, SequencerError> {
            Err(SequencerError::DiscoveryUnavailable { message: "offline".into() })
        }
    }

    /// Writes a minimal client wherever it is asked to.
    struct WritingGenerator;

    impl ClientGenerator for WritingGenerator {
        fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutcome, SequencerError> {
            let path = request.output_file();
            let source = format!(
                "class {}:\n    def register_pin_map(self, pin_map_path):\n        pass\n",
                request.class_name
            );
            std::fs::write(&path, source).map_err(|e| SequencerError::io(&path, e.to_string()))?;
            Ok(GenerationOutcome::Generated(path))
        }
    }

    fn pipeline(dir: &TempDir, discovery: Box<dyn Discovery>) -> Pipeline {
        let config = SequencerConfig {
            output_dir: dir.path().to_path_buf(),
            registry_dirs: Vec::new(),
            ..SequencerConfig::default()
        };
        Pipeline::new(
            config,
            discovery,
            Box::new(WritingGenerator),
            Box::new(HandlebarsRenderer::new().unwrap()),
        )
    }

    #[test]
    fn starts_idle() {
        let dir = TempDir::new().unwrap();
        let p = pipeline(&dir, Box::new(StaticDiscovery::default()));
        assert_eq!(p.state(), &PipelineState::Idle);
    }

    #[test]
    fn discovery_failure_fails_without_touching_disk() {
        let dir = TempDir::new().unwrap();
        let mut p = pipeline(&dir, Box::new(UnavailableDiscovery));

        let err = p.run().unwrap_err();

        assert!(matches!(err, SequencerError::DiscoveryUnavailable { .. }));
        assert!(matches!(p.state(), PipelineState::Failed(_)));
        assert!(!p.layout().clients_dir().exists());
    }

    #[test]
    fn invalid_and_duplicate_services_are_skipped() {
        let dir = TempDir::new().unwrap();
        let discovery = StaticDiscovery::from_classes([
            "ni.examples.NIDmmMeasurement_Python",
            "ni.examples.1Bad",
            "other.vendor.NIDmmMeasurement_LabVIEW",
        ]);
        let mut p = pipeline(&dir, Box::new(discovery));

        let report = p.run().unwrap();

        assert_eq!(p.state(), &PipelineState::Done);
        assert_eq!(report.generated.len(), 1);
        let skipped: Vec<_> = report.skipped.iter().map(|s| s.service_class.as_str()).collect();
        assert_eq!(skipped, vec!["ni.examples.1Bad", "other.vendor.NIDmmMeasurement_LabVIEW"]);
        assert_eq!(report.written.len(), 2);
    }

    #[test]
    fn empty_registry_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut p = pipeline(&dir, Box::new(StaticDiscovery::default()));

        let report = p.run().unwrap();

        assert_eq!(p.state(), &PipelineState::Done);
        assert!(report.written.is_empty());
        assert!(p.layout().clients_dir().is_dir());
        assert!(!p.layout().index_file().exists());
        assert!(!p.layout().sequence_file().exists());
    }
}

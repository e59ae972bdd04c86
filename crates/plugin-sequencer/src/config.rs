//! Sequencer configuration.

use std::path::PathBuf;

/// Provided interface of measurement services that get a client.
pub const V2_MEASUREMENT_SERVICE_INTERFACE: &str =
    "ni.measurementlink.measurement.v2.MeasurementService";

/// Executable invoked once per service to emit its client module.
pub const DEFAULT_GENERATOR_PROGRAM: &str = "ni-measurement-plugin-client-generator";

/// Environment variable listing registration directories (path-list syntax).
pub const REGISTRY_DIR_ENV: &str = "PLUGIN_SEQUENCER_REGISTRY_DIR";

/// How the index module names the client instances it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasStyle {
    /// `ni_dmm_measurement_client = NIDmmMeasurementClient()`
    #[default]
    ModuleName,
    /// `nidmmmeasurementclient = NIDmmMeasurementClient()`
    LowercaseClass,
}

impl AliasStyle {
    /// Parses the CLI spelling (`module-name` / `lowercase-class`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "module-name" | "module" => Some(Self::ModuleName),
            "lowercase-class" | "class" => Some(Self::LowercaseClass),
            _ => None,
        }
    }
}

/// Configuration for one sequencer run.
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Directory that receives `clients/` and `sequence.py`.
    pub output_dir: PathBuf,

    /// Provided interface used to filter registered services.
    pub interface: String,

    /// Client generator executable.
    pub generator_program: PathBuf,

    /// Directories scanned for `.serviceconfig` registrations.
    pub registry_dirs: Vec<PathBuf>,

    /// Naming of instances in the generated index module.
    pub alias_style: AliasStyle,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            interface: V2_MEASUREMENT_SERVICE_INTERFACE.to_string(),
            generator_program: PathBuf::from(DEFAULT_GENERATOR_PROGRAM),
            registry_dirs: default_registry_dirs(),
            alias_style: AliasStyle::default(),
        }
    }
}

/// Registration directories from `PLUGIN_SEQUENCER_REGISTRY_DIR`, falling back
/// to the platform plug-in directory.
pub fn default_registry_dirs() -> Vec<PathBuf> {
    if let Some(value) = std::env::var_os(REGISTRY_DIR_ENV) {
        let dirs: Vec<PathBuf> = std::env::split_paths(&value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if !dirs.is_empty() {
            return dirs;
        }
    }
    vec![platform_registry_dir()]
}

#[cfg(windows)]
fn platform_registry_dir() -> PathBuf {
    let program_data = std::env::var_os("ProgramData")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"));
    program_data
        .join("National Instruments")
        .join("Plug-Ins")
        .join("Measurements")
}

#[cfg(not(windows))]
fn platform_registry_dir() -> PathBuf {
    PathBuf::from("/usr/local/natinst/plug-ins/measurements")
}

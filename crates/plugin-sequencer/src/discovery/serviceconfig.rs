//! Discovery from `.serviceconfig` registration files.
//!
//! Measurement plug-ins register themselves by dropping a JSON file next to
//! their executable:
//!
//! ```json
//! {
//!   "services": [
//!     {
//!       "displayName": "NI-DMM Measurement (Py)",
//!       "serviceClass": "ni.examples.NIDmmMeasurement_Python",
//!       "providedInterfaces": ["ni.measurementlink.measurement.v2.MeasurementService"]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{Discovery, ServiceDescriptor};
use crate::diagnostic::SequencerError;

const SERVICE_CONFIG_EXTENSION: &str = "serviceconfig";

#[derive(Debug, Deserialize)]
struct ServiceConfigFile {
    #[serde(default)]
    services: Vec<ServiceEntry>,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    #[serde(rename = "serviceClass")]
    service_class: String,

    #[serde(rename = "displayName", default)]
    display_name: Option<String>,

    #[serde(rename = "providedInterfaces", default)]
    provided_interfaces: Vec<String>,

    /// Single-interface spelling used by older registrations.
    #[serde(rename = "providedInterface", default)]
    provided_interface: Option<String>,
}

impl ServiceEntry {
    fn provides(&self, interface_id: &str) -> bool {
        self.provided_interfaces.iter().any(|i| i == interface_id)
            || self.provided_interface.as_deref() == Some(interface_id)
    }
}

/// Scans registration directories for `.serviceconfig` files.
#[derive(Debug, Clone)]
pub struct ServiceConfigDiscovery {
    roots: Vec<PathBuf>,
}

impl ServiceConfigDiscovery {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    fn config_files(&self, root: &Path) -> Result<Vec<PathBuf>, SequencerError> {
        if !root.is_dir() {
            return Err(SequencerError::DiscoveryUnavailable {
                message: format!("registration directory '{}' does not exist", root.display()),
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| SequencerError::DiscoveryUnavailable {
                message: format!("cannot scan '{}': {}", root.display(), e),
            })?;
            let path = entry.path();
            if path.is_file()
                && path.extension().is_some_and(|ext| ext == SERVICE_CONFIG_EXTENSION)
            {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

impl Discovery for ServiceConfigDiscovery {
    fn enumerate_services(&self, interface_id: &str) -> Result<Vec<ServiceDescriptor>, SequencerError> {
        let mut seen = HashSet::new();
        let mut services = Vec::new();

        for root in &self.roots {
            for path in self.config_files(root)? {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    SequencerError::DiscoveryUnavailable {
                        message: format!("cannot read '{}': {}", path.display(), e),
                    }
                })?;

                let config: ServiceConfigFile = match serde_json::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping malformed service config");
                        continue;
                    }
                };

                for entry in config.services {
                    if !entry.provides(interface_id) {
                        continue;
                    }
                    if !seen.insert(entry.service_class.clone()) {
                        debug!(service_class = %entry.service_class, "duplicate registration ignored");
                        continue;
                    }
                    services.push(ServiceDescriptor {
                        service_class: entry.service_class,
                        display_name: entry.display_name,
                    });
                }
            }
        }

        debug!(count = services.len(), interface_id, "services discovered");
        Ok(services)
    }
}

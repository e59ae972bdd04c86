//! Discovery of registered measurement services.
//!
//! The pipeline only needs the list of service classes providing an
//! interface. Where that list comes from is behind the [`Discovery`] trait:
//! - [`ServiceConfigDiscovery`] scans `.serviceconfig` registration files
//! - [`StaticDiscovery`] serves a fixed list

mod serviceconfig;

pub use serviceconfig::ServiceConfigDiscovery;

use crate::diagnostic::SequencerError;

/// A registered measurement service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Dotted service class, e.g. `ni.examples.NIDmmMeasurement_Python`.
    pub service_class: String,
    pub display_name: Option<String>,
}

impl ServiceDescriptor {
    pub fn new(service_class: impl Into<String>) -> Self {
        Self {
            service_class: service_class.into(),
            display_name: None,
        }
    }
}

/// Source of registered services.
pub trait Discovery {
    /// Lists services providing `interface_id`, in registry order.
    fn enumerate_services(&self, interface_id: &str) -> Result<Vec<ServiceDescriptor>, SequencerError>;
}

/// Discovery over a fixed list of service classes; every entry is assumed to
/// provide whatever interface is asked for.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    services: Vec<ServiceDescriptor>,
}

impl StaticDiscovery {
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Self { services }
    }

    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(classes.into_iter().map(ServiceDescriptor::new).collect())
    }
}

impl Discovery for StaticDiscovery {
    fn enumerate_services(&self, _interface_id: &str) -> Result<Vec<ServiceDescriptor>, SequencerError> {
        Ok(self.services.clone())
    }
}

//! Identifier derivation for generated clients.
//!
//! A service class such as `ni.examples.NIDmmMeasurement_Python` becomes:
//!
//! | field         | value                        |
//! |---------------|------------------------------|
//! | `base_name`   | `NIDmmMeasurement`           |
//! | `class_name`  | `NIDmmMeasurementClient`     |
//! | `module_name` | `ni_dmm_measurement_client`  |

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;
use unicode_ident::{is_xid_continue, is_xid_start};

use crate::diagnostic::SequencerError;

/// Suffixes naming the plug-in's implementation language. Only the first match is stripped.
pub const KNOWN_SUFFIXES: &[&str] = &["_Python", "_LabVIEW"];

const CLASS_SUFFIX: &str = "Client";
const MODULE_SUFFIX: &str = "_client";

/// Names derived from one service class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIdentifiers {
    pub base_name: String,
    pub class_name: String,
    pub module_name: String,
}

/// Derives the client class and module names for a service class.
///
/// Both derived names must themselves be identifiers: dropping underscores
/// from `_1Foo` leaves a class name starting with a digit.
pub fn derive_identifiers(service_class: &str) -> Result<DerivedIdentifiers, SequencerError> {
    let base_name = extract_base_name(service_class)?;
    let class_name = create_class_name(&base_name);
    let module_name = create_module_name(&base_name);

    if !is_identifier(&class_name) || !is_identifier(&module_name) {
        return Err(SequencerError::InvalidServiceClass {
            service_class: service_class.to_string(),
            base_name,
        });
    }

    Ok(DerivedIdentifiers {
        base_name,
        class_name,
        module_name,
    })
}

/// Last dotted segment with a known suffix removed, validated as an identifier.
pub fn extract_base_name(service_class: &str) -> Result<String, SequencerError> {
    let raw = service_class.rsplit('.').next().unwrap_or(service_class);
    let base_name = strip_known_suffix(raw);

    if !is_identifier(base_name) {
        return Err(SequencerError::InvalidServiceClass {
            service_class: service_class.to_string(),
            base_name: base_name.to_string(),
        });
    }
    if !base_name.chars().any(char::is_uppercase) {
        warn!(
            service_class,
            "service class does not adhere to the recommended CamelCase format"
        );
    }
    Ok(base_name.to_string())
}

pub fn strip_known_suffix(name: &str) -> &str {
    KNOWN_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

/// Python identifier check: `XID_Start` or `_`, then `XID_Continue`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || is_xid_start(first) => chars.all(is_xid_continue),
        _ => false,
    }
}

pub fn create_class_name(base_name: &str) -> String {
    format!("{}{}", base_name.replace('_', ""), CLASS_SUFFIX)
}

pub fn create_module_name(base_name: &str) -> String {
    format!("{}{}", camel_to_snake_case(base_name), MODULE_SUFFIX)
}

fn boundary_rules() -> &'static [Regex; 4] {
    static RULES: OnceLock<[Regex; 4]> = OnceLock::new();
    RULES.get_or_init(|| {
        // Order matters: each rule runs over the output of the previous one.
        [
            r"([^_\n])([A-Z][a-z]+)",
            r"([a-z])([A-Z])",
            r"([0-9])([^_0-9])",
            r"([^_0-9])([0-9])",
        ]
        .map(|pattern| Regex::new(pattern).expect("boundary rule is a valid regex"))
    })
}

/// Converts `NIDmmMeasurement` to `ni_dmm_measurement`.
pub fn camel_to_snake_case(name: &str) -> String {
    let mut partial = name.to_string();
    for rule in boundary_rules() {
        partial = rule.replace_all(&partial, "${1}_${2}").into_owned();
    }
    partial.to_lowercase()
}

//! `sequence.py` generation.

use std::collections::HashSet;

use crate::config::AliasStyle;
use crate::diagnostic::SequencerError;
use crate::frontend::python::ast::OperationSignature;
use crate::generator::GeneratedClient;
use super::templates::{SequenceContext, TemplateRenderer, SEQUENCE_TEMPLATE};

/// Names of the operations that register a pin map, first occurrence order.
pub fn select_pin_map_operations(operations: &[OperationSignature]) -> Vec<String> {
    let mut seen = HashSet::new();
    operations
        .iter()
        .filter(|op| op.is_pin_map())
        .filter(|&op| seen.insert(op.name.as_str()))
        .map(|op| op.name.clone())
        .collect()
}

/// Renders the starter sequence for `clients`.
pub fn generate_sequence(
    clients: &[GeneratedClient],
    operations: &[OperationSignature],
    alias_style: AliasStyle,
    renderer: &dyn TemplateRenderer,
) -> Result<String, SequencerError> {
    let context = SequenceContext {
        instance_names: clients
            .iter()
            .map(|c| c.instance_alias(alias_style))
            .collect(),
        callables: select_pin_map_operations(operations),
    };
    renderer.render(SEQUENCE_TEMPLATE, &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::python::ast::Parameter;

    fn op(name: &str) -> OperationSignature {
        OperationSignature {
            name: name.to_string(),
            parameters: vec![Parameter { name: "pin_map_path".into(), default: None }],
        }
    }

    #[test]
    fn selects_pin_map_operations() {
        let ops = vec![op("measure"), op("stream_measure"), op("cancel"), op("register_pin_map")];
        assert_eq!(select_pin_map_operations(&ops), vec!["register_pin_map"]);
    }

    #[test]
    fn selection_is_a_substring_heuristic() {
        let ops = vec![op("Register_PIN_Map"), op("ping"), op("spinup")];
        assert_eq!(
            select_pin_map_operations(&ops),
            vec!["Register_PIN_Map", "ping", "spinup"]
        );
    }

    #[test]
    fn duplicate_names_selected_once() {
        let ops = vec![op("register_pin_map"), op("register_pin_map")];
        assert_eq!(select_pin_map_operations(&ops), vec!["register_pin_map"]);
    }

    struct RecordingRenderer;

    impl TemplateRenderer for RecordingRenderer {
        fn render(&self, template: &str, context: &SequenceContext) -> Result<String, SequencerError> {
            Ok(format!(
                "{}|{}|{}",
                template,
                context.instance_names.join(","),
                context.callables.join(",")
            ))
        }
    }

    #[test]
    fn passes_aliases_and_callables_to_renderer() {
        let clients = vec![GeneratedClient {
            service_class: "ni.examples.NIDmmMeasurement_Python".into(),
            module_name: "ni_dmm_measurement_client".into(),
            class_name: "NIDmmMeasurementClient".into(),
            file_path: "clients/ni_dmm_measurement_client.py".into(),
        }];
        let ops = vec![op("measure"), op("register_pin_map")];

        let out = generate_sequence(&clients, &ops, AliasStyle::LowercaseClass, &RecordingRenderer).unwrap();
        assert_eq!(out, "sequence.py|nidmmmeasurementclient|register_pin_map");
    }
}

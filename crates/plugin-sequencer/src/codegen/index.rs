//! `clients/__init__.py` generation.

use crate::config::AliasStyle;
use crate::generator::GeneratedClient;

/// Generates the index module: imports every client class, then creates one
/// instance per client.
pub fn generate_index(clients: &[GeneratedClient], alias_style: AliasStyle) -> String {
    let mut output = String::new();

    for client in clients {
        output.push_str(&format!(
            "from clients.{} import {}\n",
            client.module_name, client.class_name
        ));
    }

    output.push('\n');

    for client in clients {
        output.push_str(&format!(
            "{} = {}()\n",
            client.instance_alias(alias_style),
            client.class_name
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_client(module_name: &str, class_name: &str) -> GeneratedClient {
        GeneratedClient {
            service_class: format!("ni.examples.{}", class_name),
            module_name: module_name.to_string(),
            class_name: class_name.to_string(),
            file_path: PathBuf::from(format!("clients/{}.py", module_name)),
        }
    }

    #[test]
    fn generates_imports_then_instances() {
        let clients = vec![
            make_client("nidc_power_source_dc_voltage_client", "NIDCPowerSourceDCVoltageClient"),
            make_client("ni_dmm_measurement_client", "NIDmmMeasurementClient"),
        ];
        let code = generate_index(&clients, AliasStyle::ModuleName);

        assert_eq!(
            code,
            "from clients.nidc_power_source_dc_voltage_client import NIDCPowerSourceDCVoltageClient\n\
             from clients.ni_dmm_measurement_client import NIDmmMeasurementClient\n\
             \n\
             nidc_power_source_dc_voltage_client = NIDCPowerSourceDCVoltageClient()\n\
             ni_dmm_measurement_client = NIDmmMeasurementClient()\n"
        );
    }

    #[test]
    fn lowercase_class_aliases() {
        let clients = vec![make_client("ni_dmm_measurement_client", "NIDmmMeasurementClient")];
        let code = generate_index(&clients, AliasStyle::LowercaseClass);

        assert!(code.contains("nidmmmeasurementclient = NIDmmMeasurementClient()\n"));
    }
}

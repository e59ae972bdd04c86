//! Debug script to see what the introspector recovers from a client module.

use std::path::Path;
use plugin_sequencer::codegen::select_pin_map_operations;
use plugin_sequencer::frontend::python::PythonIntrospector;
use plugin_sequencer::frontend::Frontend;

const SAMPLE: &str = r#"
class NIDmmMeasurementClient:
    def __init__(self, *, grpc_channel=None):
        pass

    def register_pin_map(self, pin_map_path):
        pass

    def measure(self, pin_names=["Pin1"], range=10.0, mode="DC Volts"):
        pass

    def cancel(self):
        pass
"#;

fn main() {
    let mut introspector = match PythonIntrospector::new() {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = match std::env::args().nth(1) {
        Some(path) => introspector.introspect(Path::new(&path)),
        None => introspector.introspect_source(SAMPLE, Path::new("sample_client.py")),
    };

    match result {
        Ok(operations) => {
            println!("Operations:");
            for op in &operations {
                println!("  {}", op.name);
                for param in &op.parameters {
                    println!("    {} = {:?}", param.name, param.default);
                }
            }
            println!("\nPin map operations: {:?}", select_pin_map_operations(&operations));
        }
        Err(e) => {
            println!("Error: {:?}", e);
        }
    }
}

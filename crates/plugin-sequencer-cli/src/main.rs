//! Plugin sequencer CLI.
//!
//! Creates a Python sequence workspace with one client per registered
//! measurement plug-in.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use plugin_sequencer::config::{REGISTRY_DIR_ENV, V2_MEASUREMENT_SERVICE_INTERFACE};
use plugin_sequencer::{validate_output_dir, AliasStyle, Pipeline, SequencerConfig};

mod ui;

#[cfg(windows)]
const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_LIST_SEPARATOR: char = ':';

#[derive(Parser, Debug)]
#[command(name = "plugin-sequencer")]
#[command(about = "Generate measurement plug-in clients, a client index and a starter sequence")]
#[command(version)]
struct Cli {
    /// Directory that receives clients/ and sequence.py
    #[arg(
        value_name = "DIRECTORY_OUT",
        required_unless_present = "refresh_clients",
        conflicts_with = "refresh_clients"
    )]
    directory_out: Option<PathBuf>,

    /// Regenerate the clients of an existing sequence directory
    #[arg(short = 'r', long)]
    refresh_clients: bool,

    /// Sequence directory to refresh (defaults to the current directory)
    #[arg(short = 's', long, requires = "refresh_clients")]
    sequence_directory: Option<PathBuf>,

    /// Client generator executable
    #[arg(long, env = "PLUGIN_SEQUENCER_GENERATOR")]
    generator: Option<PathBuf>,

    /// Directory scanned for .serviceconfig registrations (repeatable)
    #[arg(long = "registry-dir", env = REGISTRY_DIR_ENV, value_delimiter = PATH_LIST_SEPARATOR)]
    registry_dirs: Vec<PathBuf>,

    /// Provided interface of the services to generate clients for
    #[arg(long, default_value = V2_MEASUREMENT_SERVICE_INTERFACE)]
    interface: String,

    /// Instance naming in clients/__init__.py (module-name or lowercase-class)
    #[arg(long, default_value = "module-name", value_parser = parse_alias_style)]
    alias_style: AliasStyle,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn output_dir(&self) -> miette::Result<PathBuf> {
        if self.refresh_clients {
            match &self.sequence_directory {
                Some(dir) => Ok(dir.clone()),
                None => std::env::current_dir()
                    .map_err(|e| miette::miette!("An unexpected error occurred: {}", e)),
            }
        } else {
            self.directory_out
                .clone()
                .ok_or_else(|| miette::miette!("DIRECTORY_OUT is required"))
        }
    }

    fn into_config(self, output_dir: PathBuf) -> SequencerConfig {
        let defaults = SequencerConfig::default();
        SequencerConfig {
            output_dir,
            interface: self.interface,
            generator_program: self.generator.unwrap_or(defaults.generator_program),
            registry_dirs: if self.registry_dirs.is_empty() {
                defaults.registry_dirs
            } else {
                self.registry_dirs
            },
            alias_style: self.alias_style,
        }
    }
}

fn parse_alias_style(value: &str) -> Result<AliasStyle, String> {
    AliasStyle::parse(value).ok_or_else(|| {
        format!("unknown alias style '{}' (expected module-name or lowercase-class)", value)
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output_dir = cli.output_dir()?;
    validate_output_dir(&output_dir)?;
    let config = cli.into_config(output_dir);

    ui::print_compact_header(env!("CARGO_PKG_VERSION"));
    ui::dim(&format!("Output: {}", config.output_dir.display()));

    let start = Instant::now();
    let spinner = ui::spinner("Generating measurement plug-in clients...");

    let result = Pipeline::from_config(config).and_then(|mut pipeline| pipeline.run());
    spinner.finish_and_clear();

    let report = result.map_err(|e| miette::miette!("An unexpected error occurred: {}", e))?;

    for client in &report.generated {
        ui::client_line(&client.module_name, &client.class_name);
    }
    for skipped in &report.skipped {
        ui::skipped(&skipped.service_class, &skipped.reason);
    }
    if report.generated.is_empty() {
        ui::dim("No measurement services found; nothing to sequence.");
    }

    for client in &report.generated {
        ui::written(&client.file_path);
    }
    for path in &report.written {
        ui::written(path);
    }

    ui::timing(
        &format!("Generated {} client(s)", report.generated.len()),
        start.elapsed().as_millis(),
    );
    ui::success("Sequence workspace ready.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn minimal_form_takes_directory() {
        let cli = Cli::try_parse_from(["plugin-sequencer", "out"]).unwrap();
        assert_eq!(cli.output_dir().unwrap(), PathBuf::from("out"));
        assert_eq!(cli.alias_style, AliasStyle::ModuleName);
    }

    #[test]
    fn refresh_form_uses_sequence_directory() {
        let cli = Cli::try_parse_from([
            "plugin-sequencer",
            "--refresh-clients",
            "--sequence-directory",
            "seq",
        ])
        .unwrap();
        assert_eq!(cli.output_dir().unwrap(), PathBuf::from("seq"));
    }

    #[test]
    fn refresh_form_accepts_short_flags() {
        let cli = Cli::try_parse_from(["plugin-sequencer", "-r", "-s", "seq"]).unwrap();
        assert!(cli.refresh_clients);
        assert_eq!(cli.output_dir().unwrap(), PathBuf::from("seq"));
    }

    #[test]
    fn refresh_form_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["plugin-sequencer", "--refresh-clients"]).unwrap();
        assert_eq!(cli.output_dir().unwrap(), std::env::current_dir().unwrap());
    }

    #[test]
    fn directory_is_required_without_refresh() {
        assert!(Cli::try_parse_from(["plugin-sequencer"]).is_err());
        assert!(Cli::try_parse_from(["plugin-sequencer", "--sequence-directory", "x"]).is_err());
    }

    #[test]
    fn alias_style_is_parsed() {
        let cli = Cli::try_parse_from(["plugin-sequencer", "out", "--alias-style", "lowercase-class"])
            .unwrap();
        assert_eq!(cli.alias_style, AliasStyle::LowercaseClass);
        assert!(Cli::try_parse_from(["plugin-sequencer", "out", "--alias-style", "camel"]).is_err());
    }

    #[test]
    fn flags_fill_config() {
        let cli = Cli::try_parse_from([
            "plugin-sequencer",
            "out",
            "--generator",
            "/opt/gen",
            "--registry-dir",
            "/a",
            "--registry-dir",
            "/b",
        ])
        .unwrap();
        let config = cli.into_config(PathBuf::from("out"));
        assert_eq!(config.generator_program, PathBuf::from("/opt/gen"));
        assert_eq!(config.registry_dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(config.interface, V2_MEASUREMENT_SERVICE_INTERFACE);
    }

    #[test]
    fn missing_directory_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_output_dir(&dir.path().join("absent")).is_err());
    }
}

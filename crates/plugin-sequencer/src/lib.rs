//! # Plugin Sequencer
//!
//! Turns the set of registered measurement plug-in services into a
//! ready-to-run Python sequence workspace: one client module per service, a
//! `clients/__init__.py` that instantiates them, and a starter `sequence.py`
//! that registers a pin map with every client.
//!
//! ## Architecture
//!
//! ```text
//! Registered services
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Discovery   │  .serviceconfig scan (or a fixed list)
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Workspace   │  Clean clients/ and sequence.py
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │ Naming +     │  Service class → class/module names,
//! │ Generator    │  external generator per service
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Frontend    │  Parse one client, recover its operations
//! │ (Py → ops)   │
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Codegen    │  Index module + sequence script
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plugin_sequencer::{Pipeline, SequencerConfig};
//!
//! let config = SequencerConfig {
//!     output_dir: "my_sequence".into(),
//!     ..SequencerConfig::default()
//! };
//!
//! let mut pipeline = Pipeline::from_config(config)?;
//! let report = pipeline.run()?;
//! ```

pub mod config;
pub mod diagnostic;
pub mod naming;
pub mod workspace;
pub mod discovery;
pub mod generator;
pub mod frontend;
pub mod codegen;
pub mod pipeline;

pub use config::{AliasStyle, SequencerConfig};
pub use diagnostic::SequencerError;
pub use discovery::{Discovery, ServiceConfigDiscovery, ServiceDescriptor, StaticDiscovery};
pub use generator::{ClientGenerator, CommandGenerator, GeneratedClient, GenerationOutcome, GenerationRequest};
pub use naming::{derive_identifiers, DerivedIdentifiers};
pub use pipeline::{Pipeline, PipelineReport, PipelineState, SkippedService};
pub use workspace::{validate_output_dir, WorkspaceLayout};

//! Template rendering for the sequence script.

use handlebars::Handlebars;
use serde::Serialize;

use crate::diagnostic::SequencerError;

/// Identifier of the starter sequence template.
pub const SEQUENCE_TEMPLATE: &str = "sequence.py";

const SEQUENCE_TEMPLATE_SOURCE: &str = include_str!("../../templates/sequence.py.hbs");

/// Values available to the sequence template.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceContext {
    /// Client instances exported by the index module, in discovery order.
    pub instance_names: Vec<String>,
    /// Pin map operations to call on every instance.
    pub callables: Vec<String>,
}

/// Renders a named template to text.
pub trait TemplateRenderer {
    fn render(&self, template: &str, context: &SequenceContext) -> Result<String, SequencerError>;
}

/// Handlebars renderer with the built-in templates registered.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Result<Self, SequencerError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // Output is Python source, not HTML.
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(SEQUENCE_TEMPLATE, SEQUENCE_TEMPLATE_SOURCE)
            .map_err(|e| SequencerError::TemplateRenderError {
                template: SEQUENCE_TEMPLATE.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { registry })
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, context: &SequenceContext) -> Result<String, SequencerError> {
        self.registry
            .render(template, context)
            .map_err(|e| SequencerError::TemplateRenderError {
                template: template.to_string(),
                message: e.to_string(),
            })
    }
}

//! Simple variable substitution renderer.

use std::collections::BTreeMap;

use kitgen_core::{
    application::{composer::TemplateId, ports::TemplateRenderer},
    error::KitgenResult,
};
use tracing::instrument;

use crate::templates::template_text;

/// Renderer using basic `{{VAR}}` substitution over the built-in templates.
///
/// Performs no decision logic; every value it interpolates was resolved by
/// the Composition Engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRenderer;

impl SimpleRenderer {
    /// Create a new simple renderer.
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip_all, fields(template = ?template))]
    fn render(
        &self,
        template: TemplateId,
        values: &BTreeMap<String, String>,
    ) -> KitgenResult<String> {
        let mut out = template_text(template).to_string();
        for (key, value) in values {
            out = out.replace(&format!("{{{{{key}}}}}"), value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_all_occurrences() {
        let rendered = SimpleRenderer::new()
            .render(
                TemplateId::WebIndex,
                &values(&[("APP_NAME", "notes")]),
            )
            .unwrap();
        assert!(rendered.contains("<title>notes</title>"));
        assert!(rendered.contains("<h1>notes</h1>"));
        assert!(!rendered.contains("{{APP_NAME}}"));
    }

    #[test]
    fn snapshot_template_is_pure_passthrough() {
        let rendered = SimpleRenderer::new()
            .render(
                TemplateId::SpecSnapshot,
                &values(&[("SPEC_JSON", "{\"appName\": \"notes\"}")]),
            )
            .unwrap();
        assert_eq!(rendered, "{\"appName\": \"notes\"}\n");
    }

    #[test]
    fn bootstrap_interpolates_fragment_blocks() {
        let rendered = SimpleRenderer::new()
            .render(
                TemplateId::Bootstrap,
                &values(&[
                    ("APP_NAME", "notes"),
                    ("PORT", "8080"),
                    ("IMPORTS", "import CouchDB"),
                    ("SERVICE_VARIABLES", "internal var couchDBClient: CouchDBClient?"),
                    ("SERVICE_INITIALIZERS", "couchDBClient = nil"),
                    ("CAPABILITY_INITIALIZERS", ""),
                    ("MIDDLEWARE_REGISTRATIONS", ""),
                    ("ENDPOINT_REGISTRATIONS", ""),
                ]),
            )
            .unwrap();
        assert!(rendered.contains("import CouchDB"));
        assert!(rendered.contains("onPort: 8080"));
        assert!(rendered.contains("internal var couchDBClient"));
    }
}

//! Output document assembly

use crate::engine::Outcome;
use crate::xml::writer::write_element;

/// Declaration emitted ahead of the results unless disabled
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// How query results are laid out in the output document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    /// Start the output with [`XML_DECLARATION`]
    pub xml_declaration: bool,
    /// Wrap the results in an element with this name
    pub root_element: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            root_element: None,
        }
    }
}

impl OutputConfig {
    #[must_use]
    pub const fn xml_declaration(mut self, enabled: bool) -> Self {
        self.xml_declaration = enabled;
        self
    }

    #[must_use]
    pub fn root_element(mut self, name: Option<String>) -> Self {
        self.root_element = name;
        self
    }
}

/// Render selected nodes as the final output document
pub fn render(outcome: &Outcome<'_>, config: &OutputConfig) -> String {
    let mut body = String::new();
    if outcome.anchor_found {
        for node in &outcome.nodes {
            write_element(node, &mut body);
        }
        body.push('\n');
    }

    let mut output = String::new();
    if config.xml_declaration {
        output.push_str(XML_DECLARATION);
        output.push('\n');
    }

    match &config.root_element {
        Some(root) => {
            output.push_str(&format!("<{root}>\n{body}\n</{root}>\n"));
        }
        None => output.push_str(&body),
    }

    output
}

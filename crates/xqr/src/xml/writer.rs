//! XML serialization

use crate::xml::model::{Content, Element};

/// Serialize an element and its subtree as markup
pub fn to_string(element: &Element) -> String {
    let mut output = String::new();
    write_element(element, &mut output);
    output
}

/// Append the markup for `element` to `output`
pub fn write_element(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (key, value) in &element.attributes {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attribute(value));
        output.push('"');
    }

    if element.children.is_empty() {
        output.push_str("/>");
        return;
    }

    output.push('>');
    for child in &element.children {
        match child {
            Content::Element(child) => write_element(child, output),
            Content::Text(text) => output.push_str(&escape_text(text)),
        }
    }
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(input: &str) -> String {
    escape_text(input).replace('"', "&quot;")
}

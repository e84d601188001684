//! The synthetic document built from a procedure's output parameters.
//!
//! JSON, XML-tree and XML-string return shapes are three renderings of this
//! one tree, not three different algorithms: the document is built once from
//! the materialized parameter map and then serialized per the caller's
//! requested syntax.

use crate::types::CellValue;

const ROOT_NAME: &str = "Root";

/// One child element: an output parameter's name and its value rendered as
/// text. Null values keep their element, with no text.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentElement {
    pub name: String,
    pub text: Option<String>,
}

/// Tree of output-parameter elements under a single synthetic root.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    elements: Vec<DocumentElement>,
}

impl Document {
    /// Build the document from a materialized parameter map, one element per
    /// output parameter, in declaration order.
    pub fn from_parameters(parameters: &[(String, CellValue)]) -> Self {
        let elements = parameters
            .iter()
            .map(|(name, value)| DocumentElement {
                name: name.clone(),
                text: value.render_text(),
            })
            .collect();
        Self { elements }
    }

    pub fn elements(&self) -> &[DocumentElement] {
        &self.elements
    }

    /// Indented XML rendering of the tree.
    pub fn to_xml_string(&self) -> String {
        if self.elements.is_empty() {
            return format!("<{ROOT_NAME} />");
        }
        let mut out = format!("<{ROOT_NAME}>\n");
        for element in &self.elements {
            match &element.text {
                Some(text) => out.push_str(&format!(
                    "  <{name}>{value}</{name}>\n",
                    name = element.name,
                    value = escape_xml(text)
                )),
                None => out.push_str(&format!("  <{} />\n", element.name)),
            }
        }
        out.push_str(&format!("</{ROOT_NAME}>"));
        out
    }

    /// JSON object rendering, root omitted: one member per element, null
    /// members for empty elements. Member order follows element order.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for element in &self.elements {
            let value = match &element.text {
                Some(text) => serde_json::Value::String(text.clone()),
                None => serde_json::Value::Null,
            };
            map.insert(element.name.clone(), value);
        }
        serde_json::Value::Object(map)
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

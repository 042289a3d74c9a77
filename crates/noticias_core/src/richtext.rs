use serde::{Deserialize, Serialize};

const EXCERPT_MAX_CHARS: usize = 140;

/// Rich-text document as delivered by the headless CMS: a tree of typed
/// nodes. Node types we do not map are simply not rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub content: Vec<Node>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "nodeType", default)]
    pub node_type: String,
    #[serde(default)]
    pub content: Vec<Node>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub data: NodeData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub uri: Option<String>,
}

impl Document {
    /// Renders the tree into presentational markup.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        for node in &self.content {
            render_node(node, &mut out);
        }
        out
    }

    /// Concatenates leaf text values across the tree and truncates to the
    /// excerpt limit with an ellipsis marker.
    pub fn excerpt(&self) -> String {
        let mut text = String::new();
        for node in &self.content {
            collect_text(node, &mut text);
        }
        truncate_excerpt(&text)
    }
}

fn render_node(node: &Node, out: &mut String) {
    match node.node_type.as_str() {
        "text" => out.push_str(&escape_html(&node.value)),
        "paragraph" => wrap(node, "p", out),
        "heading-1" => wrap(node, "h1", out),
        "heading-2" => wrap(node, "h2", out),
        "heading-3" => wrap(node, "h3", out),
        "heading-4" => wrap(node, "h4", out),
        "heading-5" => wrap(node, "h5", out),
        "heading-6" => wrap(node, "h6", out),
        "unordered-list" => wrap(node, "ul", out),
        "ordered-list" => wrap(node, "ol", out),
        "list-item" => wrap(node, "li", out),
        "hyperlink" => {
            let href = node.data.uri.as_deref().unwrap_or("#");
            out.push_str(&format!("<a href=\"{}\">", escape_html(href)));
            for child in &node.content {
                render_node(child, out);
            }
            out.push_str("</a>");
        }
        "document" => {
            for child in &node.content {
                render_node(child, out);
            }
        }
        _ => {}
    }
}

fn wrap(node: &Node, tag: &str, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    for child in &node.content {
        render_node(child, out);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn collect_text(node: &Node, out: &mut String) {
    if node.node_type == "text" {
        out.push_str(&node.value);
    }
    for child in &node.content {
        collect_text(child, out);
    }
}

/// Truncates plain text to the excerpt limit, appending an ellipsis when
/// anything was cut.
pub fn truncate_excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= EXCERPT_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(EXCERPT_MAX_CHARS).collect();
    out.push('…');
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Node {
        Node {
            node_type: "text".to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }

    fn paragraph(children: Vec<Node>) -> Node {
        Node {
            node_type: "paragraph".to_string(),
            content: children,
            ..Default::default()
        }
    }

    #[test]
    fn single_paragraph_renders_and_excerpts() {
        let doc = Document {
            content: vec![paragraph(vec![text("Hola mundo")])],
        };
        assert_eq!(doc.render_html(), "<p>Hola mundo</p>");
        assert_eq!(doc.excerpt(), "Hola mundo");
    }

    #[test]
    fn excerpt_truncates_at_limit() {
        let long = "a".repeat(200);
        let doc = Document {
            content: vec![paragraph(vec![text(&long)])],
        };
        let excerpt = doc.excerpt();
        assert_eq!(excerpt.chars().count(), 141);
        assert!(excerpt.ends_with('…'));
    }

    #[test]
    fn unmapped_node_types_are_skipped() {
        let doc = Document {
            content: vec![
                Node {
                    node_type: "embedded-asset-block".to_string(),
                    ..Default::default()
                },
                paragraph(vec![text("visible")]),
            ],
        };
        assert_eq!(doc.render_html(), "<p>visible</p>");
    }

    #[test]
    fn hyperlinks_and_lists_map_to_markup() {
        let doc = Document {
            content: vec![Node {
                node_type: "unordered-list".to_string(),
                content: vec![Node {
                    node_type: "list-item".to_string(),
                    content: vec![Node {
                        node_type: "hyperlink".to_string(),
                        content: vec![text("enlace")],
                        data: NodeData {
                            uri: Some("https://example.com".to_string()),
                        },
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
                ..Default::default()
            }],
        };
        assert_eq!(
            doc.render_html(),
            "<ul><li><a href=\"https://example.com\">enlace</a></li></ul>"
        );
    }

    #[test]
    fn text_is_html_escaped() {
        let doc = Document {
            content: vec![paragraph(vec![text("a < b & c")])],
        };
        assert_eq!(doc.render_html(), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn deserializes_cms_shape() {
        let raw = r#"{
            "nodeType": "document",
            "content": [
                {"nodeType": "paragraph", "content": [
                    {"nodeType": "text", "value": "Hola"}
                ]}
            ]
        }"#;
        let doc: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.excerpt(), "Hola");
    }
}

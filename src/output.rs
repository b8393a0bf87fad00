use std::io::{self, Write};

use serde::Serialize;

use crate::tree::DisplayNode;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        Self::print_raw(&json)
    }

    pub fn print_raw(text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(text.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub fn render_options(nodes: &[DisplayNode]) -> String {
    let mut html = String::new();
    for node in nodes {
        render_node(node, &mut html);
    }
    html
}

fn render_node(node: &DisplayNode, html: &mut String) {
    match node {
        DisplayNode::Group { label, children } => {
            html.push_str(&format!("<optgroup label=\"{}\">", escape_html(label)));
            for child in children {
                render_node(child, html);
            }
            html.push_str("</optgroup>");
        }
        DisplayNode::Item { path, label } => {
            html.push_str(&format!(
                "<option value=\"{}\">{}</option>",
                escape_html(path),
                escape_html(label)
            ));
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

//! Terminal rendering of decoded responses.

use anyhow::Result;
use serde_json::Value;

use runwire_core::{DataTree, FileDescriptor};

/// Pretty JSON with binary content summarized as `<tag, N bytes>`.
pub fn pretty(tree: &DataTree) -> Result<String> {
    Ok(serde_json::to_string_pretty(&summarize(tree))?)
}

fn summarize(tree: &DataTree) -> Value {
    match tree {
        DataTree::Null => Value::Null,
        DataTree::Bool(b) => Value::Bool(*b),
        DataTree::Number(n) => Value::Number(n.clone()),
        DataTree::String(s) => Value::String(s.clone()),
        DataTree::Array(items) => Value::Array(items.iter().map(summarize).collect()),
        DataTree::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), summarize(v)))
                .collect(),
        ),
        DataTree::Binary(leaf) => {
            Value::String(format!("<{}, {} bytes>", leaf.type_tag(), leaf.len()))
        }
        DataTree::File(file) => Value::String(format!(
            "<{}, {} bytes>",
            file.type_tag,
            file.payload.len()
        )),
        DataTree::Stream(_) => Value::String("<stream>".to_string()),
    }
}

/// First file descriptor in depth-first, insertion order.
pub fn first_file(tree: &DataTree) -> Option<&FileDescriptor> {
    match tree {
        DataTree::File(file) => Some(file),
        DataTree::Array(items) => items.iter().find_map(first_file),
        DataTree::Object(fields) => fields.values().find_map(first_file),
        _ => None,
    }
}

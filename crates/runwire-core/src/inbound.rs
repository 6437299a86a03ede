//! Inbound transcoding — rebuild binary payloads from a response body.
//!
//! A node is a binary marker only when it is exactly
//! `{"type": "Buffer", "data": [...]}`: two keys, that discriminator, an
//! array payload. Anything looser is an ordinary object and is walked as one.

use serde_json::{Map, Value};

use crate::error::{child_path, Result, TranscodeError};
use crate::tree::{BinaryLeaf, DataTree, Fields, FileDescriptor, MARKER_TYPE};

/// Nesting limit of the `serde_json` parser.
pub const MAX_DEPTH: usize = 128;

/// Parse a response body and rebuild any embedded buffers.
///
/// Text that is not JSON is returned unchanged as a string. JSON nested
/// deeper than [`MAX_DEPTH`] is an error rather than text, so buffers inside
/// it are never silently left as markers.
pub fn from_wire_form(body: &str) -> Result<DataTree> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => from_wire_value(value),
        Err(err) if is_depth_limit(&err) => Err(TranscodeError::TooDeep { limit: MAX_DEPTH }),
        Err(err) => {
            tracing::debug!(error = %err, "response body is not JSON, passing through");
            Ok(DataTree::String(body.to_owned()))
        }
    }
}

// serde_json reports the limit as a syntax error with its own message.
fn is_depth_limit(err: &serde_json::Error) -> bool {
    err.to_string().starts_with("recursion limit exceeded")
}

/// Rebuild buffers in a body that has already been parsed.
pub fn from_wire_value(value: Value) -> Result<DataTree> {
    rehydrate(value, "")
}

fn rehydrate(value: Value, path: &str) -> Result<DataTree> {
    match value {
        Value::Object(map) => {
            if let Some(data) = marker_data(&map) {
                return rebuild(data, path).map(DataTree::File);
            }
            map.into_iter()
                .map(|(key, child)| {
                    rehydrate(child, &child_path(path, &key)).map(|child| (key, child))
                })
                .collect::<Result<Fields>>()
                .map(DataTree::Object)
        }
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, child)| rehydrate(child, &child_path(path, &i.to_string())))
            .collect::<Result<Vec<_>>>()
            .map(DataTree::Array),
        scalar => Ok(DataTree::from(scalar)),
    }
}

/// The byte array of a node with the exact marker shape.
fn marker_data(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    if map.len() != 2 || map.get("type").and_then(Value::as_str) != Some(MARKER_TYPE) {
        return None;
    }
    map.get("data").and_then(Value::as_array)
}

fn rebuild(data: &[Value], path: &str) -> Result<FileDescriptor> {
    let bytes = data
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| TranscodeError::MalformedMarker {
                    path: path.to_owned(),
                    reason: format!("data[{i}] is {item}, expected an integer in 0..=255"),
                })
        })
        .collect::<Result<Vec<u8>>>()?;

    let file = FileDescriptor::new(BinaryLeaf::new(bytes));
    tracing::debug!(%path, bytes = file.payload.len(), tag = %file.type_tag, "rebuilt buffer");
    Ok(file)
}

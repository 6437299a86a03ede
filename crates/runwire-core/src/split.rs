//! Payload splitting — one JSON text part plus at most one binary part.

use indexmap::IndexMap;

use crate::error::{Result, TranscodeError};
use crate::sniff::TypeTag;
use crate::tree::{BinaryLeaf, DataTree, Fields};

/// The binary half of a [`WireTuple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePart {
    /// Key the payload was found under.
    pub field: String,
    pub payload: BinaryLeaf,
    pub type_tag: TypeTag,
}

impl WirePart {
    /// File name for the multipart part, e.g. `image.jpg`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.field, self.type_tag.extension())
    }
}

/// Transmission unit: every non-binary field as JSON text, plus the binary
/// field if there was one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireTuple {
    pub data: String,
    pub file: Option<WirePart>,
}

/// Split a flat, already-transcoded field map.
///
/// Fields are visited in insertion order. Nested containers stay in `data`;
/// only top-level binary values are lifted out. A second top-level binary
/// field is rejected rather than silently dropped.
pub fn split(fields: &Fields) -> Result<WireTuple> {
    let mut file: Option<WirePart> = None;
    let mut scalars: IndexMap<&str, &DataTree> = IndexMap::with_capacity(fields.len());

    for (key, value) in fields {
        let part = match value {
            DataTree::Binary(leaf) => WirePart {
                field: key.clone(),
                payload: leaf.clone(),
                type_tag: leaf.type_tag(),
            },
            DataTree::File(descriptor) => WirePart {
                field: key.clone(),
                payload: descriptor.payload.clone(),
                type_tag: descriptor.type_tag,
            },
            DataTree::Stream(_) => {
                return Err(TranscodeError::UndrainedStream { field: key.clone() });
            }
            _ => {
                scalars.insert(key.as_str(), value);
                continue;
            }
        };

        if let Some(first) = &file {
            return Err(TranscodeError::MultipleBinaryFields {
                first: first.field.clone(),
                second: key.clone(),
            });
        }
        file = Some(part);
    }

    let data = serde_json::to_string(&scalars)?;
    tracing::debug!(
        fields = scalars.len(),
        file = file.as_ref().map(|f| f.field.as_str()),
        "split payload"
    );
    Ok(WireTuple { data, file })
}

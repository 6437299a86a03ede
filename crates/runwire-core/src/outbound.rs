//! Outbound transcoding — binary leaves and streams become file descriptors.
//!
//! The input tree is only borrowed. Every container in the output is freshly
//! built; scalars are copied. Streams are the one exception to "nothing is
//! touched": draining consumes the underlying source, but the tree that
//! holds the handle is left as it was.

use futures::future::{try_join_all, BoxFuture, FutureExt};

use crate::error::{child_path, Result, TranscodeError};
use crate::tree::{DataTree, Fields, FileDescriptor};

/// Convert a whole tree to its wire form.
pub async fn to_wire_form(tree: &DataTree) -> Result<DataTree> {
    convert(tree, String::new()).await
}

/// Convert a flat field map, as collected from command arguments.
pub async fn to_wire_fields(fields: &Fields) -> Result<Fields> {
    convert_fields(fields, "").await
}

fn convert(tree: &DataTree, path: String) -> BoxFuture<'_, Result<DataTree>> {
    async move {
        match tree {
            DataTree::Binary(leaf) => Ok(DataTree::File(FileDescriptor::new(leaf.clone()))),
            DataTree::Stream(stream) => {
                let leaf = stream
                    .drain()
                    .await
                    .map_err(|source| TranscodeError::Drain {
                        path: path.clone(),
                        source,
                    })?;
                let file = FileDescriptor::new(leaf);
                tracing::debug!(%path, bytes = file.payload.len(), tag = %file.type_tag, "stream converted");
                Ok(DataTree::File(file))
            }
            DataTree::Array(items) => {
                let converted = try_join_all(
                    items
                        .iter()
                        .enumerate()
                        .map(|(i, item)| convert(item, child_path(&path, &i.to_string()))),
                )
                .await?;
                Ok(DataTree::Array(converted))
            }
            DataTree::Object(fields) => Ok(DataTree::Object(convert_fields(fields, &path).await?)),
            other => Ok(other.clone()),
        }
    }
    .boxed()
}

/// Siblings are converted concurrently; each result is re-paired with its
/// original key.
async fn convert_fields(fields: &Fields, path: &str) -> Result<Fields> {
    let values = try_join_all(
        fields
            .iter()
            .map(|(key, value)| convert(value, child_path(path, key))),
    )
    .await?;
    Ok(fields.keys().cloned().zip(values).collect())
}

//! Data tree model — JSON-shaped values with first-class binary leaves.
//!
//! JSON has no binary type, so binary content is carried as distinct variants
//! and only turned into the `{"type":"Buffer","data":[...]}` marker when a
//! tree is serialized.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};
use indexmap::IndexMap;
use serde::ser::{Error as _, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::Number;
use tokio::io::AsyncRead;
use tokio::sync::Mutex;

use crate::drain::{drain_chunks, drain_reader};
use crate::sniff::{classify, TypeTag};

/// Discriminator value of the wire binary marker.
pub const MARKER_TYPE: &str = "Buffer";

/// Field map. Iteration and serialization follow insertion order; equality
/// does not.
pub type Fields = IndexMap<String, DataTree>;

// ── Binary leaf ───────────────────────────────────────────────────────────────

/// Immutable, exclusively owned byte payload.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BinaryLeaf(Bytes);

impl BinaryLeaf {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Sniffed type of these bytes.
    pub fn type_tag(&self) -> TypeTag {
        classify(&self.0)
    }
}

impl From<Bytes> for BinaryLeaf {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for BinaryLeaf {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl AsRef<[u8]> for BinaryLeaf {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for BinaryLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryLeaf({}, {} bytes)", self.type_tag(), self.0.len())
    }
}

/// Serializes as the wire binary marker.
impl Serialize for BinaryLeaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut marker = serializer.serialize_struct("Buffer", 2)?;
        marker.serialize_field("type", MARKER_TYPE)?;
        marker.serialize_field("data", self.as_bytes())?;
        marker.end()
    }
}

// ── File descriptor ───────────────────────────────────────────────────────────

/// A binary payload paired with its sniffed type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub payload: BinaryLeaf,
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
}

impl FileDescriptor {
    /// Wrap a payload, tagging it by sniffing its bytes.
    pub fn new(payload: BinaryLeaf) -> Self {
        let type_tag = payload.type_tag();
        Self { payload, type_tag }
    }
}

// ── Byte stream ───────────────────────────────────────────────────────────────

pub(crate) enum Source {
    Reader(Pin<Box<dyn AsyncRead + Send>>),
    Chunks(BoxStream<'static, io::Result<Bytes>>),
}

/// Shared handle to a one-shot readable byte source.
///
/// Clones refer to the same source and compare equal; handles over different
/// sources never do. The source can be drained once.
#[derive(Clone)]
pub struct ByteStream {
    source: Arc<Mutex<Option<Source>>>,
}

impl ByteStream {
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self::new(Source::Reader(Box::pin(reader)))
    }

    pub fn from_chunks<S>(chunks: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self::new(Source::Chunks(chunks.boxed()))
    }

    fn new(source: Source) -> Self {
        Self {
            source: Arc::new(Mutex::new(Some(source))),
        }
    }

    /// Read the source to end-of-data.
    ///
    /// A second call on the same source fails rather than yielding an empty
    /// buffer.
    pub async fn drain(&self) -> io::Result<BinaryLeaf> {
        let source = self.source.lock().await.take();
        match source {
            Some(Source::Reader(mut reader)) => drain_reader(&mut reader).await,
            Some(Source::Chunks(chunks)) => drain_chunks(chunks).await,
            None => Err(io::Error::other("stream already drained")),
        }
    }
}

impl PartialEq for ByteStream {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteStream(..)")
    }
}

// ── Data tree ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataTree {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<DataTree>),
    Object(Fields),
    Binary(BinaryLeaf),
    File(FileDescriptor),
    Stream(ByteStream),
}

impl DataTree {
    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileDescriptor> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// Look up a key when this is an object.
    pub fn get(&self, key: &str) -> Option<&DataTree> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// True for values that become a multipart file part rather than JSON.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_) | Self::File(_) | Self::Stream(_))
    }
}

impl Serialize for DataTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => items.serialize(serializer),
            Self::Object(fields) => fields.serialize(serializer),
            Self::Binary(leaf) => leaf.serialize(serializer),
            Self::File(file) => file.serialize(serializer),
            Self::Stream(_) => Err(S::Error::custom(
                "byte stream must be drained before serialization",
            )),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<serde_json::Value> for DataTree {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for DataTree {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for DataTree {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for DataTree {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for DataTree {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for DataTree {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for DataTree {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Bytes> for DataTree {
    fn from(bytes: Bytes) -> Self {
        Self::Binary(BinaryLeaf::new(bytes))
    }
}

impl From<Vec<u8>> for DataTree {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(BinaryLeaf::new(bytes))
    }
}

impl From<BinaryLeaf> for DataTree {
    fn from(leaf: BinaryLeaf) -> Self {
        Self::Binary(leaf)
    }
}

impl From<FileDescriptor> for DataTree {
    fn from(file: FileDescriptor) -> Self {
        Self::File(file)
    }
}

impl From<ByteStream> for DataTree {
    fn from(stream: ByteStream) -> Self {
        Self::Stream(stream)
    }
}

impl From<Vec<DataTree>> for DataTree {
    fn from(items: Vec<DataTree>) -> Self {
        Self::Array(items)
    }
}

impl From<Fields> for DataTree {
    fn from(fields: Fields) -> Self {
        Self::Object(fields)
    }
}

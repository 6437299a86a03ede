//! runwire-core — binary-aware transcoding between caller data trees and the
//! multipart wire form used by the remote run service.
//!
//! Outbound: `split(&to_wire_fields(&fields).await?)` turns a field map into a
//! JSON text part plus at most one binary part. Inbound: `from_wire_form`
//! turns a response body back into a tree, rebuilding any embedded buffers.

pub mod config;
pub mod drain;
pub mod error;
pub mod inbound;
pub mod locator;
pub mod outbound;
pub mod sniff;
pub mod split;
pub mod tree;

pub use error::TranscodeError;
pub use inbound::{from_wire_form, from_wire_value};
pub use locator::is_url;
pub use outbound::{to_wire_fields, to_wire_form};
pub use sniff::{classify, TypeTag};
pub use split::{split, WirePart, WireTuple};
pub use tree::{BinaryLeaf, ByteStream, DataTree, Fields, FileDescriptor};

//! Errors surfaced by the transcoders.

/// Failures that escape a transcoder call.
///
/// Paths use JSON Pointer syntax relative to the tree handed to the call,
/// e.g. `/image` or `/file/file`. The root is the empty string.
#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    /// A byte stream errored before end-of-data, or was already drained.
    #[error("failed to drain stream at {path:?}: {source}")]
    Drain {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// More than one binary field was handed to the payload splitter.
    #[error("only one binary field can be sent per call, found {first:?} and {second:?}")]
    MultipleBinaryFields { first: String, second: String },

    /// A stream reached the splitter without passing through the outbound transcoder.
    #[error("field {field:?} is a stream that was never drained")]
    UndrainedStream { field: String },

    /// A node has the binary marker shape but its bytes cannot be rebuilt.
    #[error("malformed binary marker at {path:?}: {reason}")]
    MalformedMarker { path: String, reason: String },

    /// A JSON body nests deeper than the parser will follow.
    #[error("response nests deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("failed to serialize fields: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = TranscodeError> = std::result::Result<T, E>;

/// Append one segment to a JSON Pointer path, escaping `~` and `/`.
pub(crate) fn child_path(parent: &str, segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    format!("{parent}/{escaped}")
}

//! Stream drain — read a byte source to end-of-data into one buffer.

use std::io;

use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, TryStreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::tree::BinaryLeaf;

/// Drain an async reader. Bytes keep their read order.
pub async fn drain_reader<R>(reader: &mut R) -> io::Result<BinaryLeaf>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    tracing::debug!(bytes = buf.len(), "drained reader");
    Ok(BinaryLeaf::new(buf))
}

/// Drain a stream of chunks, concatenating them in arrival order.
///
/// The first chunk error aborts the drain and is returned as-is.
pub async fn drain_chunks<S>(chunks: S) -> io::Result<BinaryLeaf>
where
    S: Stream<Item = io::Result<Bytes>>,
{
    let buf = chunks
        .try_fold(BytesMut::new(), |mut buf, chunk| async move {
            buf.extend_from_slice(&chunk);
            Ok(buf)
        })
        .await?;
    tracing::debug!(bytes = buf.len(), "drained chunk stream");
    Ok(BinaryLeaf::new(buf.freeze()))
}

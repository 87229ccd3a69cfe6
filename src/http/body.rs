//! Response body module
//!
//! Every response carries a boxed body so empty, in-memory and streamed file
//! bodies share one type. File bodies are read in bounded chunks and never
//! buffered whole.

use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::Frame;
use std::io::{self, SeekFrom};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::ByteRange;

/// Maximum bytes held in memory per chunk while streaming a file
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Body type of every response produced by the server
pub type FileBody = UnsyncBoxBody<Bytes, io::Error>;

pub fn empty() -> FileBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

pub fn full(data: impl Into<Bytes>) -> FileBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

fn from_reader<R>(reader: R) -> FileBody
where
    R: AsyncRead + Send + 'static,
{
    let stream = ReaderStream::with_capacity(reader, CHUNK_SIZE).map_ok(Frame::data);
    StreamBody::new(stream).boxed_unsync()
}

/// Stream a file from its current position to EOF
pub fn whole_file(file: File) -> FileBody {
    from_reader(file)
}

/// Seek to `range.start` and stream exactly `range.len()` bytes
///
/// Preceding bytes are skipped by the seek and never read.
pub async fn file_slice(mut file: File, range: ByteRange) -> io::Result<FileBody> {
    file.seek(SeekFrom::Start(range.start)).await?;
    Ok(from_reader(file.take(range.len())))
}

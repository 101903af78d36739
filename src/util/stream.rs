use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::byte_stream::error::Error as ByteStreamError;
use bytes::{Bytes, BytesMut};
use futures::{stream, Stream, TryStreamExt};

/// Adapts an SDK body into a plain `futures` stream of chunks.
pub fn body_stream(body: ByteStream) -> impl Stream<Item = Result<Bytes, ByteStreamError>> {
    stream::unfold(body, |mut body| async move {
        body.next().await.map(|chunk| (chunk, body))
    })
}

/// Collects every chunk until the stream ends. The first failing chunk
/// aborts the collection.
pub async fn stream_to_buffer<S, E>(stream: S) -> Result<Bytes, E>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let buf = stream
        .try_fold(BytesMut::new(), |mut acc, chunk| async move {
            acc.extend_from_slice(&chunk);
            Ok(acc)
        })
        .await?;

    Ok(buf.freeze())
}

/// Like [`stream_to_buffer`], decoded as UTF-8. Invalid sequences become U+FFFD.
pub async fn stream_to_string<S, E>(stream: S) -> Result<String, E>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let buf = stream_to_buffer(stream).await?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

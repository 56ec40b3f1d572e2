//! Helper utilities for relaying transfers
//!
//! Filename handling for the attachment headers and the bounded copy loop
//! that moves upload bytes into a downloader's sink.

use std::pin::pin;

use axum::http::HeaderValue;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error;

use p2pshare_common::COPY_BUFFER_SIZE;

use crate::sessions::{DownloadSink, SinkClosed};

/// Characters left unescaped in an RFC 5987 `filename*` value (attr-char)
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Why a copy from uploader to downloader stopped
#[derive(Debug, Error)]
pub enum CopyError {
    /// Reading the uploader's body failed
    #[error("reading upload failed: {0}")]
    Upload(String),
    /// The downloader's response went away
    #[error(transparent)]
    Receiver(#[from] SinkClosed),
}

/// Reduce a declared filename to its final path component
///
/// Browsers and some clients send full paths (`C:\Users\me\a.txt`); only the
/// last component is meaningful to the receiver.
pub fn base_filename(declared: &str) -> &str {
    declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(declared)
        .trim()
}

/// Build the `Content-Disposition` header for an attachment
///
/// The quoted `filename` parameter carries an ASCII-safe fallback; the exact
/// name travels percent-encoded in `filename*`.
pub fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|ch| match ch {
            '"' | '\\' => '_',
            ch if ch.is_ascii_graphic() || ch == ' ' => ch,
            _ => '_',
        })
        .collect();
    let encoded = utf8_percent_encode(filename, ATTR_CHAR);
    let value = format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}");

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Copy an upload stream into a downloader's sink
///
/// Chunks larger than `COPY_BUFFER_SIZE` are split before being queued, so
/// the relay holds at most one incoming chunk plus the sink's bounded queue
/// of `COPY_BUFFER_SIZE` slices, whatever the file size. Returns the number
/// of bytes delivered.
pub async fn copy_to_sink<S, E>(source: S, sink: &mut DownloadSink) -> Result<u64, CopyError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut source = pin!(source);
    let mut copied = 0u64;

    while let Some(chunk) = source.next().await {
        let mut chunk = chunk.map_err(|e| CopyError::Upload(e.to_string()))?;
        while !chunk.is_empty() {
            let slice = chunk.split_to(chunk.len().min(COPY_BUFFER_SIZE));
            let len = slice.len() as u64;
            sink.write(slice).await?;
            copied += len;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::{Peer, envelope};
    use futures_util::stream;

    #[test]
    fn test_base_filename() {
        assert_eq!(base_filename("a.txt"), "a.txt");
        assert_eq!(base_filename("/tmp/dir/a.txt"), "a.txt");
        assert_eq!(base_filename(r"C:\Users\me\report.pdf"), "report.pdf");
        assert_eq!(base_filename("dir/"), "");
        assert_eq!(base_filename(""), "");
    }

    #[test]
    fn test_content_disposition_ascii() {
        let value = content_disposition("a.txt");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"a.txt\"; filename*=UTF-8''a.txt"
        );
    }

    #[test]
    fn test_content_disposition_escapes_quotes_and_spaces() {
        let value = content_disposition("my \"best\" file.txt");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"my _best_ file.txt\"; filename*=UTF-8''my%20%22best%22%20file.txt"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("résumé.pdf");
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"r_sum_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
    }

    #[test]
    fn test_content_disposition_control_characters() {
        let value = content_disposition("a\r\nb");
        assert!(value.to_str().unwrap().starts_with("attachment; filename=\"a__b\""));
    }

    #[tokio::test]
    async fn test_copy_splits_large_chunks() {
        let (peer, receiver) = envelope();
        let Peer { mut sink, done } = peer;
        let big = Bytes::from(vec![7u8; COPY_BUFFER_SIZE * 3 + 5]);

        let reader = tokio::spawn(async move {
            let (_, body) = receiver.into_delivery().await.unwrap();
            let chunks: Vec<Bytes> = body.map(|c| c.unwrap()).collect().await;
            chunks
        });

        sink.send_head(crate::sessions::DeliveryHead {
            filename: "big".to_string(),
        })
        .unwrap();
        let source = stream::iter(vec![Ok::<_, std::io::Error>(big)]);
        let copied = copy_to_sink(source, &mut sink).await.unwrap();
        drop(sink);
        done.fire(crate::sessions::TransferOutcome::Completed);

        assert_eq!(copied, (COPY_BUFFER_SIZE * 3 + 5) as u64);
        let chunks = reader.await.unwrap();
        assert_eq!(chunks.len(), 4);
        assert!(chunks.iter().all(|c| c.len() <= COPY_BUFFER_SIZE));
        assert_eq!(chunks.last().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_copy_empty_stream() {
        let (peer, _receiver) = envelope();
        let Peer { mut sink, .. } = peer;
        let source = stream::iter(Vec::<Result<Bytes, std::io::Error>>::new());
        assert_eq!(copy_to_sink(source, &mut sink).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_copy_reports_upload_error() {
        let (peer, _receiver) = envelope();
        let Peer { mut sink, .. } = peer;
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"abc")),
            Err(std::io::Error::other("connection reset")),
        ]);

        let err = copy_to_sink(source, &mut sink).await.unwrap_err();
        assert!(matches!(err, CopyError::Upload(msg) if msg.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_copy_reports_closed_receiver() {
        let (peer, receiver) = envelope();
        let Peer { mut sink, .. } = peer;
        drop(receiver);
        let source = stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(b"abc"))]);

        let err = copy_to_sink(source, &mut sink).await.unwrap_err();
        assert!(matches!(err, CopyError::Receiver(SinkClosed)));
    }
}

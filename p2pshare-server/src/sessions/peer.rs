//! Peer envelope handed from a waiting downloader to its uploader
//!
//! The downloader keeps the receiving half (`PeerReceiver`) and deposits the
//! sending half (`Peer`) into the session's hand-off slot. The uploader that
//! takes the envelope becomes the exclusive writer of the downloader's
//! response until it fires the completion signal.

use std::io;

use bytes::Bytes;
use futures_util::Stream;
use futures_util::stream;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Number of buffered chunks between an uploader and its downloader
pub const SINK_CHANNEL_CAPACITY: usize = 8;

/// Metadata the uploader sets on the downloader's response before any body bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryHead {
    /// Declared filename of the uploaded item
    pub filename: String,
}

/// Final result of a transfer, reported to the downloader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Every byte of the upload was delivered
    Completed,
    /// The copy stopped early; the downloader has a truncated stream
    Failed(String),
}

/// The downloader's response has gone away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("downloader is no longer receiving")]
pub struct SinkClosed;

/// Writable handle onto a waiting downloader's response
#[derive(Debug)]
pub struct DownloadSink {
    head: Option<oneshot::Sender<DeliveryHead>>,
    body: mpsc::Sender<Bytes>,
}

impl DownloadSink {
    /// Send response headers; only the first call has any effect
    pub fn send_head(&mut self, head: DeliveryHead) -> Result<(), SinkClosed> {
        match self.head.take() {
            Some(tx) => tx.send(head).map_err(|_| SinkClosed),
            None => Ok(()),
        }
    }

    /// Write one chunk of the body, waiting while the downloader's buffer is full
    pub async fn write(&mut self, chunk: Bytes) -> Result<(), SinkClosed> {
        self.body.send(chunk).await.map_err(|_| SinkClosed)
    }
}

/// One-shot completion event fired by the uploader
///
/// Firing consumes the signal, so it can fire at most once. Dropping it
/// unfired is reported to the downloader as a failed transfer.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<TransferOutcome>,
}

impl Completion {
    pub fn fire(self, outcome: TransferOutcome) {
        // Downloader may already be gone; nothing left to release then
        let _ = self.tx.send(outcome);
    }
}

/// Envelope carried through the hand-off slot
#[derive(Debug)]
pub struct Peer {
    pub sink: DownloadSink,
    pub done: Completion,
}

/// Downloader's end of a peer envelope
#[derive(Debug)]
pub struct PeerReceiver {
    head: oneshot::Receiver<DeliveryHead>,
    body: mpsc::Receiver<Bytes>,
    done: oneshot::Receiver<TransferOutcome>,
}

/// The uploader dropped the envelope before sending any headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("uploader abandoned the transfer before it started")]
pub struct HeadMissing;

/// Create a connected envelope and receiver pair
pub fn envelope() -> (Peer, PeerReceiver) {
    let (head_tx, head_rx) = oneshot::channel();
    let (body_tx, body_rx) = mpsc::channel(SINK_CHANNEL_CAPACITY);
    let (done_tx, done_rx) = oneshot::channel();

    let peer = Peer {
        sink: DownloadSink {
            head: Some(head_tx),
            body: body_tx,
        },
        done: Completion { tx: done_tx },
    };
    let receiver = PeerReceiver {
        head: head_rx,
        body: body_rx,
        done: done_rx,
    };
    (peer, receiver)
}

enum BodyState {
    Streaming {
        body: mpsc::Receiver<Bytes>,
        done: oneshot::Receiver<TransferOutcome>,
    },
    Finished,
}

impl PeerReceiver {
    /// Wait for the uploader's headers, then expose the body as a stream
    ///
    /// The stream yields chunks until the uploader closes the sink, then waits
    /// for the completion signal. A failed or missing completion ends the
    /// stream with an error so the transport aborts instead of ending cleanly.
    pub async fn into_delivery(
        self,
    ) -> Result<(DeliveryHead, impl Stream<Item = io::Result<Bytes>>), HeadMissing> {
        let head = self.head.await.map_err(|_| HeadMissing)?;
        let state = BodyState::Streaming {
            body: self.body,
            done: self.done,
        };

        let body = stream::unfold(state, |state| async move {
            let BodyState::Streaming { mut body, done } = state else {
                return None;
            };
            if let Some(chunk) = body.recv().await {
                return Some((Ok(chunk), BodyState::Streaming { body, done }));
            }
            match done.await {
                Ok(TransferOutcome::Completed) => None,
                Ok(TransferOutcome::Failed(reason)) => {
                    Some((Err(io::Error::other(reason)), BodyState::Finished))
                }
                Err(_) => Some((
                    Err(io::Error::other("uploader vanished without completing")),
                    BodyState::Finished,
                )),
            }
        });

        Ok((head, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn head(name: &str) -> DeliveryHead {
        DeliveryHead {
            filename: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_completed_delivery() {
        let (peer, receiver) = envelope();
        let Peer { mut sink, done } = peer;

        let writer = tokio::spawn(async move {
            sink.send_head(head("a.txt")).unwrap();
            sink.write(Bytes::from_static(b"hello ")).await.unwrap();
            sink.write(Bytes::from_static(b"world")).await.unwrap();
            drop(sink);
            done.fire(TransferOutcome::Completed);
        });

        let (head, body) = receiver.into_delivery().await.unwrap();
        assert_eq!(head.filename, "a.txt");
        let chunks: Vec<_> = body.collect().await;
        let bytes: Vec<u8> = chunks
            .into_iter()
            .flat_map(|c| c.unwrap().to_vec())
            .collect();
        assert_eq!(bytes, b"hello world");
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_delivery_ends_with_error() {
        let (peer, receiver) = envelope();
        let Peer { mut sink, done } = peer;

        tokio::spawn(async move {
            sink.send_head(head("b.bin")).unwrap();
            sink.write(Bytes::from_static(b"partial")).await.unwrap();
            drop(sink);
            done.fire(TransferOutcome::Failed("upload reset".to_string()));
        });

        let (_, body) = receiver.into_delivery().await.unwrap();
        let items: Vec<_> = body.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from_static(b"partial"));
        assert!(items[1].is_err());
    }

    #[tokio::test]
    async fn test_dropped_completion_is_a_failure() {
        let (peer, receiver) = envelope();
        let Peer { mut sink, done } = peer;
        sink.send_head(head("c")).unwrap();
        drop(sink);
        drop(done);

        let (_, body) = receiver.into_delivery().await.unwrap();
        let items: Vec<_> = body.collect().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[tokio::test]
    async fn test_envelope_dropped_before_head() {
        let (peer, receiver) = envelope();
        drop(peer);
        assert!(matches!(receiver.into_delivery().await, Err(HeadMissing)));
    }

    #[tokio::test]
    async fn test_write_after_receiver_dropped() {
        let (peer, receiver) = envelope();
        let Peer { mut sink, .. } = peer;
        drop(receiver);

        assert_eq!(sink.send_head(head("d")), Err(SinkClosed));
        assert_eq!(sink.write(Bytes::from_static(b"x")).await, Err(SinkClosed));
    }

    #[tokio::test]
    async fn test_sink_applies_backpressure() {
        let (peer, _receiver) = envelope();
        let Peer { mut sink, .. } = peer;

        for _ in 0..SINK_CHANNEL_CAPACITY {
            sink.write(Bytes::from_static(b"x")).await.unwrap();
        }
        let blocked = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            sink.write(Bytes::from_static(b"x")),
        )
        .await;
        assert!(blocked.is_err(), "sink accepted more than its capacity");
    }

    #[tokio::test]
    async fn test_only_first_head_is_sent() {
        let (peer, receiver) = envelope();
        let Peer { mut sink, done } = peer;
        sink.send_head(head("first")).unwrap();
        sink.send_head(head("second")).unwrap();
        drop(sink);
        done.fire(TransferOutcome::Completed);

        let (head, _) = receiver.into_delivery().await.unwrap();
        assert_eq!(head.filename, "first");
    }
}

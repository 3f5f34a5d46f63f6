//! Fire-and-forget redraw requests.
//!
//! Views never render synchronously; they post a request and the main loop
//! re-renders when it gets around to it. Sending never blocks: a full channel
//! already holds a pending redraw, so extra requests are coalesced.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Capacity of the redraw channel.
const REDRAW_CHANNEL_CAPACITY: usize = 16;

/// A single "please re-render" signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawRequest;

/// Cloneable handle for posting redraw requests.
#[derive(Clone, Debug)]
pub struct RedrawSender {
    tx: mpsc::Sender<RedrawRequest>,
}

impl RedrawSender {
    /// Create a redraw sender and the receiver the main loop should poll.
    pub fn channel() -> (Self, mpsc::Receiver<RedrawRequest>) {
        let (tx, rx) = mpsc::channel(REDRAW_CHANNEL_CAPACITY);
        (Self { tx }, rx)
    }

    /// Request a redraw without waiting for the consumer.
    pub fn request(&self) {
        match self.tx.try_send(RedrawRequest) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!("redraw already pending, coalescing request");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("redraw receiver dropped, ignoring request");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_delivered() {
        let (redraw, mut rx) = RedrawSender::channel();
        redraw.request();
        assert_eq!(rx.try_recv().ok(), Some(RedrawRequest));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_full_channel_does_not_block() {
        let (redraw, mut rx) = RedrawSender::channel();
        for _ in 0..REDRAW_CHANNEL_CAPACITY * 4 {
            redraw.request();
        }

        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, REDRAW_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (redraw, rx) = RedrawSender::channel();
        drop(rx);
        redraw.request();
    }
}

//! Progress events posted by the encoder.
//!
//! The producer sends events on a [`std::sync::mpsc`] channel; an observer
//! receives until the channel closes. Dropping the sender is the completion
//! signal, so there is no shared flag to poll.

use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Encoding begins; `total` frames are expected.
    Started { total: u32 },
    /// Frame `index` (1-based) has been written.
    Frame { index: u32 },
    /// All frames written.
    Finished { frames: u32 },
}

/// A sender/receiver pair for progress events.
pub fn channel() -> (Sender<ProgressEvent>, Receiver<ProgressEvent>) {
    mpsc::channel()
}

/// Post an event if anyone is listening. A gone observer is not an error.
pub(crate) fn post(progress: Option<&Sender<ProgressEvent>>, event: ProgressEvent) {
    if let Some(tx) = progress {
        let _ = tx.send(event);
    }
}

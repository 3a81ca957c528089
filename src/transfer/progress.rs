//! Transfer progress reporting

use crossbeam::channel::Sender;

/// Snapshot emitted after each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// First notification of this transfer
    pub is_first: bool,

    /// Bytes moved so far
    pub transferred: u64,

    /// Size of the whole transfer
    pub total: u64,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.transferred >= self.total
    }
}

/// Receives progress notifications
pub trait ProgressSink {
    fn on_progress(&mut self, progress: Progress);
}

impl<F: FnMut(Progress)> ProgressSink for F {
    fn on_progress(&mut self, progress: Progress) {
        self(progress)
    }
}

/// Forwards notifications over a channel to another thread
#[derive(Debug, Clone)]
pub struct ChannelProgress(pub Sender<Progress>);

impl ProgressSink for ChannelProgress {
    fn on_progress(&mut self, progress: Progress) {
        // A dropped receiver only means nobody is watching
        let _ = self.0.send(progress);
    }
}

/// Discards notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _progress: Progress) {}
}

/// Tracks the running count for one transfer
pub(crate) struct ProgressTracker<'a, P: ProgressSink + ?Sized> {
    sink: &'a mut P,
    transferred: u64,
    total: u64,
    started: bool,
}

impl<'a, P: ProgressSink + ?Sized> ProgressTracker<'a, P> {
    pub(crate) fn new(sink: &'a mut P, total: u64) -> Self {
        Self {
            sink,
            transferred: 0,
            total,
            started: false,
        }
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        self.transferred += bytes as u64;
        let progress = Progress {
            is_first: !self.started,
            transferred: self.transferred,
            total: self.total,
        };
        self.started = true;
        self.sink.on_progress(progress);
    }

    pub(crate) fn transferred(&self) -> u64 {
        self.transferred
    }
}

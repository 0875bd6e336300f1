use crate::{error::InsufficientData, ExpectedData, Position, SharedFifo};
use std::sync::Arc;

/// Read-capability handle over a shared channel.
///
/// The counterpart of [`Producer`](crate::Producer): it exposes the
/// consuming and observing operations of a [`SharedFifo`] and nothing else.
/// There is no public constructor: a consumer is obtained from
/// [`Producer::consumer`](crate::Producer::consumer) or returned by
/// [`Pipeline::process`](crate::Pipeline::process).
///
/// Cloning is cheap; clones share the channel and therefore its single read
/// cursor, so two consumers reading the same buffer see each other's cursor
/// movement.
#[derive(Clone, Debug)]
pub struct Consumer {
    buffer: Arc<SharedFifo>,
}

impl Consumer {
    pub(crate) fn new(buffer: Arc<SharedFifo>) -> Self {
        Self { buffer }
    }

    pub(crate) fn channel(&self) -> &Arc<SharedFifo> {
        &self.buffer
    }

    /// Blocking non-destructive read; see [`SharedFifo::read`].
    pub fn read(&self, count: usize) -> ExpectedData<InsufficientData> {
        self.buffer.read(count)
    }

    /// Blocking destructive read from the front of storage; see
    /// [`SharedFifo::extract`].
    pub fn extract(&self, count: usize) -> ExpectedData<InsufficientData> {
        self.buffer.extract(count)
    }

    /// Moves the shared read cursor; see [`SharedFifo::seek`].
    pub fn seek(&self, offset: isize, mode: Position) {
        self.buffer.seek(offset, mode);
    }

    /// Empties the channel's storage (lifecycle flags untouched).
    pub fn clear(&self) {
        self.buffer.clear();
    }

    /// Bytes readable from the current cursor without blocking.
    pub fn available_bytes(&self) -> usize {
        self.buffer.available_bytes()
    }

    /// Number of bytes currently stored in the channel.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// `true` if the channel stores no bytes.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// `true` while reads can succeed (the channel is not errored).
    pub fn is_readable(&self) -> bool {
        self.buffer.is_readable()
    }

    /// `true` while the channel accepts writes.
    pub fn is_writable(&self) -> bool {
        self.buffer.is_writable()
    }

    /// End-of-data: the channel is errored, or closed with nothing left to
    /// read from the cursor.
    pub fn eof(&self) -> bool {
        self.buffer.eof()
    }
}

use crate::{Consumer, SharedFifo};
use std::sync::Arc;

/// Write-capability handle over a shared channel.
///
/// A `Producer` owns a reference to a [`SharedFifo`] and exposes only the
/// operations that push the channel forward: writing, closing, and erroring.
/// Cloning is cheap and every clone refers to the same channel, so several
/// threads can hold producers for one buffer at once.
///
/// The read half is obtained with [`consumer`](Self::consumer); user code can
/// only ever get a [`Consumer`] through a producer (or a pipeline), which
/// keeps the capability split honest.
///
/// # Examples
///
/// ```
/// use bytepipe::Producer;
///
/// let producer = Producer::new();
/// let consumer = producer.consumer();
///
/// producer.write_str("payload");
/// producer.close();
///
/// assert_eq!(consumer.read(0), Ok(b"payload".to_vec()));
/// assert!(consumer.eof());
/// ```
#[derive(Clone, Debug)]
pub struct Producer {
    buffer: Arc<SharedFifo>,
}

impl Producer {
    /// Creates a producer over a fresh, empty channel.
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(SharedFifo::new()),
        }
    }

    /// Appends `data` to the channel and wakes blocked readers.  Returns
    /// `false` when the channel is closed or errored or `data` is empty.
    pub fn write(&self, data: &[u8]) -> bool {
        self.buffer.write(data)
    }

    /// Convenience write of a string's bytes.
    pub fn write_str(&self, text: &str) -> bool {
        self.buffer.write_str(text)
    }

    /// Closes the channel: no further writes, buffered bytes stay readable,
    /// blocked readers complete with what is available.
    pub fn close(&self) {
        self.buffer.close();
    }

    /// Puts the channel in the error state: writes fail, readers (blocked or
    /// future) receive [`InsufficientData`](crate::InsufficientData).
    pub fn set_error(&self) {
        self.buffer.set_error();
    }

    /// `true` while the channel accepts writes.
    pub fn is_writable(&self) -> bool {
        self.buffer.is_writable()
    }

    /// Spawns a read-capability handle over the same channel.  All consumers
    /// created this way share the channel's single read cursor.
    pub fn consumer(&self) -> Consumer {
        Consumer::new(Arc::clone(&self.buffer))
    }
}

impl Default for Producer {
    fn default() -> Self {
        Self::new()
    }
}

/// Adopts the consumer's channel, yielding its write half.
impl From<&Consumer> for Producer {
    fn from(consumer: &Consumer) -> Self {
        Self {
            buffer: Arc::clone(consumer.channel()),
        }
    }
}

/// Wraps an explicitly constructed channel.
impl From<Arc<SharedFifo>> for Producer {
    fn from(buffer: Arc<SharedFifo>) -> Self {
        Self { buffer }
    }
}

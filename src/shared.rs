use crate::{error::InsufficientData, ExpectedData, Fifo, Position};
use std::sync::{Condvar, Mutex, MutexGuard};

/// Thread-safe [`Fifo`] with blocking reads.
///
/// All state of the inner [`Fifo`], including the cursor and lifecycle
/// flags, lives behind a single mutex; a condition variable wakes blocked
/// readers whenever a mutation could satisfy their predicate.  There is no
/// lock-free fast path.
///
/// # Blocking semantics
///
/// [`read`](Self::read) and [`extract`](Self::extract) with a positive count
/// park the calling thread until the requested bytes exist, or the buffer is
/// closed or errored.  On wakeup:
///
/// * errored: the call returns [`InsufficientData`];
/// * closed with fewer bytes than requested: the call returns everything
///   still available (possibly nothing) as a success, since no more bytes
///   will ever arrive;
/// * otherwise: the call returns exactly the requested bytes.
///
/// A count of zero never blocks and returns whatever is available right now.
///
/// Writers never block: storage grows to fit and [`write`](Self::write) only
/// fails once the buffer is closed or errored.
///
/// # Sharing
///
/// `SharedFifo` is normally not used directly but through the capability
/// handles [`Producer`](crate::Producer) and [`Consumer`](crate::Consumer),
/// which share one `Arc<SharedFifo>`.  Multiple producers and consumers may
/// operate on the same buffer concurrently; bytes from a single writer appear
/// in write order, but no fairness is guaranteed between consumers racing for
/// the same bytes.
#[derive(Debug, Default)]
pub struct SharedFifo {
    inner: Mutex<Fifo>,
    data_available: Condvar,
}

impl SharedFifo {
    /// Creates an empty, open buffer.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Fifo> {
        self.inner.lock().unwrap()
    }

    /// Appends `data`, then wakes all waiters so blocked readers re-evaluate
    /// their predicates.  Returns `false` when the buffer is closed or
    /// errored or `data` is empty; the wakeup happens either way.
    pub fn write(&self, data: &[u8]) -> bool {
        let accepted = self.lock().write(data);
        self.data_available.notify_all();
        accepted
    }

    /// Convenience write of a string's bytes; same rules and wakeup as
    /// [`write`](Self::write).
    pub fn write_str(&self, text: &str) -> bool {
        self.write(text.as_bytes())
    }

    /// Blocking non-destructive read; see the type-level documentation for
    /// the wakeup rules.  With `count == 0` this is [`Fifo::read`] under the
    /// lock: immediate, whatever the cursor has left.
    pub fn read(&self, count: usize) -> ExpectedData<InsufficientData> {
        let mut fifo = self.lock();
        if count > 0 {
            fifo = self
                .data_available
                .wait_while(fifo, |fifo| {
                    fifo.is_writable() && fifo.available_bytes() < count
                })
                .unwrap();
            if fifo.is_readable() && fifo.available_bytes() < count {
                // Closed before enough bytes arrived: hand over the remainder
                // rather than failing a reader that waited in good faith.
                return fifo.read(0);
            }
        }
        fifo.read(count)
    }

    /// Blocking destructive read from the front of storage.  The wait
    /// predicate uses total stored bytes (extraction ignores the cursor).
    /// A successful non-empty extraction wakes all waiters, since the other
    /// consumers' predicates depend on the sizes it just changed.
    pub fn extract(&self, count: usize) -> ExpectedData<InsufficientData> {
        let result = {
            let mut fifo = self.lock();
            if count > 0 {
                fifo = self
                    .data_available
                    .wait_while(fifo, |fifo| fifo.is_writable() && fifo.len() < count)
                    .unwrap();
                if fifo.is_readable() && fifo.len() < count {
                    fifo.extract(0)
                } else {
                    fifo.extract(count)
                }
            } else {
                fifo.extract(0)
            }
        };
        if matches!(&result, Ok(data) if !data.is_empty()) {
            self.data_available.notify_all();
        }
        result
    }

    /// Moves the read cursor, then wakes all waiters: a rewind can raise
    /// `available_bytes` above a blocked reader's threshold.
    pub fn seek(&self, offset: isize, mode: Position) {
        self.lock().seek(offset, mode);
        self.data_available.notify_all();
    }

    /// Empties storage (flags untouched), then wakes all waiters.
    pub fn clear(&self) {
        self.lock().clear();
        self.data_available.notify_all();
    }

    /// Discards the already-read prefix, then wakes all waiters.
    pub fn clean(&self) {
        self.lock().clean();
        self.data_available.notify_all();
    }

    /// Closes the buffer for writes and wakes all waiters.  Blocked readers
    /// complete with whatever is available.
    pub fn close(&self) {
        self.lock().close();
        self.data_available.notify_all();
    }

    /// Puts the buffer in the error state and wakes all waiters.  Blocked
    /// readers complete with [`InsufficientData`].
    pub fn set_error(&self) {
        self.lock().set_error();
        self.data_available.notify_all();
    }

    /// Number of bytes currently stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` if no bytes are stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Bytes readable from the current cursor without blocking.
    pub fn available_bytes(&self) -> usize {
        self.lock().available_bytes()
    }

    /// `true` while the buffer accepts writes.
    pub fn is_writable(&self) -> bool {
        self.lock().is_writable()
    }

    /// `true` while reads can succeed.
    pub fn is_readable(&self) -> bool {
        self.lock().is_readable()
    }

    /// End-of-data condition; see [`Fifo::eof`].
    pub fn eof(&self) -> bool {
        self.lock().eof()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegates_basic_operations() {
        let fifo = SharedFifo::new();
        assert!(fifo.write(b"shared"));
        assert_eq!(fifo.len(), 6);
        assert_eq!(fifo.read(0), Ok(b"shared".to_vec()));
        assert_eq!(fifo.available_bytes(), 0);
        fifo.seek(0, Position::Absolute);
        assert_eq!(fifo.extract(6), Ok(b"shared".to_vec()));
        assert!(fifo.is_empty());
    }

    #[test]
    fn read_zero_never_blocks_on_empty() {
        let fifo = SharedFifo::new();
        assert_eq!(fifo.read(0), Ok(Vec::new()));
        assert_eq!(fifo.extract(0), Ok(Vec::new()));
    }

    #[test]
    fn closed_positive_read_returns_remainder() {
        let fifo = SharedFifo::new();
        fifo.write(b"abc");
        fifo.close();
        // More than available: the blocking variant degrades to a partial
        // success instead of the plain Fifo's error.
        assert_eq!(fifo.read(10), Ok(b"abc".to_vec()));
        assert_eq!(fifo.read(10), Ok(Vec::new()));
        assert!(fifo.eof());
    }

    #[test]
    fn closed_positive_extract_returns_remainder() {
        let fifo = SharedFifo::new();
        fifo.write(b"abc");
        fifo.close();
        assert_eq!(fifo.extract(10), Ok(b"abc".to_vec()));
        assert_eq!(fifo.extract(10), Ok(Vec::new()));
    }

    #[test]
    fn errored_reads_fail_immediately() {
        let fifo = SharedFifo::new();
        fifo.write(b"abc");
        fifo.set_error();
        assert!(fifo.read(1).is_err());
        assert!(fifo.extract(1).is_err());
        assert!(!fifo.write(b"d"));
        assert!(fifo.eof());
    }

    #[test]
    fn clean_keeps_unread_bytes() {
        let fifo = SharedFifo::new();
        fifo.write(b"abcdef");
        fifo.read(4).unwrap();
        fifo.clean();
        assert_eq!(fifo.len(), 2);
        assert_eq!(fifo.read(0), Ok(b"ef".to_vec()));
    }

    #[test]
    fn exact_read_when_enough_is_buffered() {
        let fifo = SharedFifo::new();
        fifo.write(b"abcdef");
        assert_eq!(fifo.read(4), Ok(b"abcd".to_vec()));
        assert_eq!(fifo.available_bytes(), 2);
    }
}

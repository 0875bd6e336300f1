use crate::{error::InsufficientData, ExpectedData, Position};
use std::collections::VecDeque;

/// Growable byte FIFO with a movable, non-destructive read cursor.
///
/// Bytes are appended at the back by [`write`](Self::write) and leave the
/// buffer from the front via [`extract`](Self::extract).  Independently of
/// extraction, a read cursor supports non-destructive consumption:
/// [`read`](Self::read) returns bytes starting at the cursor and advances it,
/// leaving storage untouched, and [`seek`](Self::seek) repositions it.
///
/// The cursor is an offset into *current* storage, not a stable name for a
/// byte: when `extract(k)` removes `k` bytes from the front, the cursor is
/// pulled back by the same amount (saturating at zero) so that it keeps
/// naming the same logical unread byte.
///
/// # Lifecycle
///
/// A buffer starts open.  [`close`](Self::close) refuses further writes but
/// leaves buffered bytes readable until drained; [`set_error`](Self::set_error)
/// makes the buffer both unwritable and unreadable.  Both transitions are
/// idempotent and permanent; [`clear`](Self::clear) empties storage but
/// never resurrects a closed or errored buffer.
///
/// # Examples
///
/// ```
/// use bytepipe::Fifo;
///
/// let mut fifo = Fifo::new();
/// assert!(fifo.write(b"stream"));
///
/// // Non-destructive: the bytes stay in storage.
/// assert_eq!(fifo.read(3), Ok(b"str".to_vec()));
/// assert_eq!(fifo.len(), 6);
///
/// // Destructive: the front of storage goes away and the cursor follows.
/// assert_eq!(fifo.extract(3), Ok(b"str".to_vec()));
/// assert_eq!(fifo.read(0), Ok(b"eam".to_vec()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Fifo {
    storage: VecDeque<u8>,
    cursor: usize,
    closed: bool,
    error: bool,
}

impl Fifo {
    /// Creates an empty, open buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes currently stored.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// `true` if no bytes are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Bytes readable from the current cursor position without blocking,
    /// i.e. `len() - cursor`.
    pub fn available_bytes(&self) -> usize {
        self.storage.len() - self.cursor
    }

    /// `true` while the buffer accepts writes (neither closed nor errored).
    pub fn is_writable(&self) -> bool {
        !self.closed && !self.error
    }

    /// `true` while reads can succeed (the buffer is not errored).  A closed
    /// buffer remains readable until drained.
    pub fn is_readable(&self) -> bool {
        !self.error
    }

    /// End-of-data condition: the buffer is errored, or closed with nothing
    /// left to read from the cursor.
    pub fn eof(&self) -> bool {
        self.error || (self.closed && self.available_bytes() == 0)
    }

    /// Appends `data` to storage.
    ///
    /// Returns `false`, leaving the buffer untouched, when the buffer is
    /// closed or errored, or when `data` is empty.  Otherwise appends and
    /// returns `true`; storage grows as needed and writes never block.
    pub fn write(&mut self, data: &[u8]) -> bool {
        if self.closed || self.error || data.is_empty() {
            return false;
        }
        self.storage.extend(data.iter().copied());
        true
    }

    /// Convenience write of a string's bytes; same rules as
    /// [`write`](Self::write).
    pub fn write_str(&mut self, text: &str) -> bool {
        self.write(text.as_bytes())
    }

    /// Non-destructive read of `count` bytes starting at the cursor.
    ///
    /// A `count` of zero means "everything from the cursor to the end", which
    /// always succeeds, possibly with an empty result.  A positive `count`
    /// fails with [`InsufficientData`] unless that many bytes are available;
    /// this container never waits for more (see
    /// [`SharedFifo`](crate::SharedFifo) for the blocking variant).  On
    /// success the cursor advances past the returned bytes.
    pub fn read(&mut self, count: usize) -> ExpectedData<InsufficientData> {
        if self.error {
            return Err(InsufficientData::errored());
        }
        let available = self.available_bytes();
        let to_read = if count == 0 {
            available
        } else if count > available {
            return Err(InsufficientData::short_read());
        } else {
            count
        };
        let data = self
            .storage
            .iter()
            .skip(self.cursor)
            .take(to_read)
            .copied()
            .collect();
        self.cursor += to_read;
        Ok(data)
    }

    /// Destructive read of `count` bytes from the *front of storage*.
    ///
    /// Extraction ignores the cursor's position but maintains it: the cursor
    /// is pulled back by the number of bytes removed (saturating at zero) so
    /// that it continues to name the same logical unread byte.  A `count` of
    /// zero drains the entire buffer and resets the cursor.  A positive
    /// `count` fails with [`InsufficientData`] unless the buffer holds that
    /// many bytes.
    pub fn extract(&mut self, count: usize) -> ExpectedData<InsufficientData> {
        if self.error {
            return Err(InsufficientData::errored());
        }
        let stored = self.storage.len();
        let to_take = if count == 0 {
            stored
        } else if count > stored {
            return Err(InsufficientData::short_extract());
        } else {
            count
        };
        let data = self.storage.drain(..to_take).collect();
        self.cursor = self.cursor.saturating_sub(to_take);
        Ok(data)
    }

    /// Moves the read cursor.
    ///
    /// With [`Position::Absolute`] the cursor becomes `offset` clamped into
    /// `[0, len]`; with [`Position::Relative`] the (possibly negative)
    /// `offset` is added to the cursor and the result clamped the same way.
    /// Seeking never fails and never modifies storage.
    pub fn seek(&mut self, offset: isize, mode: Position) {
        let target = match mode {
            Position::Absolute => offset,
            Position::Relative => self.cursor as isize + offset,
        };
        self.cursor = target.clamp(0, self.storage.len() as isize) as usize;
    }

    /// Empties storage and resets the cursor.  The closed/errored flags are
    /// left alone: lifecycle is monotonic.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.cursor = 0;
    }

    /// Discards the already-read prefix `[0, cursor)` and resets the cursor.
    /// Unread bytes are preserved.
    pub fn clean(&mut self) {
        self.storage.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Closes the buffer for further writes.  Idempotent; buffered bytes
    /// remain readable.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Puts the buffer in the error state: writes fail and reads return
    /// [`InsufficientData`].  Idempotent and terminal.
    pub fn set_error(&mut self) {
        self.error = true;
    }
}

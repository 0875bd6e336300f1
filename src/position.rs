use serde::{Deserialize, Serialize};

/// How the offset passed to a seek operation is interpreted.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// The offset is measured from the start of storage. Negative offsets
    /// clamp to the start.
    Absolute,
    /// The offset is applied to the current read cursor and may be negative.
    Relative,
}

//! Byte-oriented streaming FIFO buffers and multi-stage pipelines.
//!
//! The crate is built from three layers:
//!
//! * [`Fifo`] is a single-threaded growable byte container with destructive
//!   ([`extract`](Fifo::extract)) and non-destructive ([`read`](Fifo::read))
//!   consumption, a seekable read cursor, and closed/errored lifecycle flags.
//! * [`SharedFifo`] is the same container made thread-safe, with reads that
//!   block until enough bytes arrive or the buffer is closed or errored.
//!   [`Producer`] and [`Consumer`] are cheap capability-split handles over a
//!   shared channel: producers write and close, consumers read and seek.
//! * [`Pipeline`] is an ordered sequence of stage functions, each running
//!   against the consumer half of the previous stage's channel and the
//!   producer half of its own, either concurrently on worker threads or
//!   (for the final stage) inline in the caller's thread.
//!
//! ```
//! use bytepipe::{ExecutionMode, LoggerHandle, Pipeline, Producer};
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.add_pipe(|input, output, _logger| {
//!     while !input.eof() {
//!         if let Ok(data) = input.extract(0) {
//!             if !data.is_empty() {
//!                 let upper: Vec<u8> = data.iter().map(u8::to_ascii_uppercase).collect();
//!                 output.write(&upper);
//!             }
//!         }
//!     }
//!     output.close();
//! });
//!
//! let input = Producer::new();
//! input.write(b"hello");
//! input.close();
//!
//! let result = pipeline.process(input.consumer(), ExecutionMode::Sync, LoggerHandle::disabled());
//! assert_eq!(result.read(0), Ok(b"HELLO".to_vec()));
//! ```

mod consumer;
mod error;
mod fifo;
mod logger;
mod pipeline;
mod position;
mod producer;
mod shared;

pub use crate::consumer::Consumer;
pub use crate::error::{DetailedError, ExpectedData, InsufficientData};
pub use crate::fifo::Fifo;
pub use crate::logger::LoggerHandle;
pub use crate::pipeline::{ExecutionMode, PipeFunction, Pipeline};
pub use crate::position::Position;
pub use crate::producer::Producer;
pub use crate::shared::SharedFifo;

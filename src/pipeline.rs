use crate::{Consumer, LoggerHandle, Producer};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
    thread::{Builder, JoinHandle},
};

/// How [`Pipeline::process`] schedules its stages.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// The final stage runs inline in the caller's thread and all earlier
    /// stages' workers are joined before `process` returns: when the call
    /// comes back, the pipeline has fully finished.  The earlier stages
    /// still run on worker threads: they must execute concurrently with the
    /// final stage for bytes to flow through the chain at all.
    Sync,
    /// Every stage runs on its own worker thread and `process` returns as
    /// soon as all of them are spawned.  The returned consumer blocks as it
    /// reads, so callers simply drain it.
    #[default]
    Async,
}

/// A pipeline stage.
///
/// Stages are plain callables invoked as `stage(input, output, logger)`.  A
/// well-behaved stage loops reading `input` until [`Consumer::eof`], writes
/// derived bytes to `output`, and finishes by closing the output (or erroring
/// it, which cancels the rest of the pipeline).  Stages must not panic;
/// failures are reported through [`Producer::set_error`].
pub type PipeFunction = Arc<dyn Fn(Consumer, Producer, LoggerHandle) + Send + Sync + 'static>;

/// An ordered sequence of stage functions wired together by internal shared
/// channels.
///
/// Stage *i* reads from the consumer half of stage *i−1*'s channel (stage 0
/// reads the caller-provided input) and writes to the producer half of its
/// own.  [`process`](Self::process) spawns one worker thread per stage (all
/// of them in [`Async`](ExecutionMode::Async) mode, all but the last in
/// [`Sync`](ExecutionMode::Sync) mode) and hands back the consumer half of
/// the final channel.
///
/// The pipeline owns its workers: they are joined before any re-run and by
/// the destructor, so no stage can outlive the pipeline and touch a freed
/// channel.  A pipeline is reusable; `process` may be called again once a run
/// has finished.  Cloning copies the stage list but never the workers.
///
/// # Cancellation
///
/// [`set_error`](Self::set_error) puts every internal channel of the current
/// run in the error state: stages see their output become unwritable and
/// their input reads fail, and are expected to return promptly.
pub struct Pipeline {
    pipes: Vec<PipeFunction>,
    producers: Vec<Producer>,
    workers: Vec<JoinHandle<()>>,
}

impl Pipeline {
    /// Creates a pipeline with no stages.
    pub fn new() -> Self {
        Self {
            pipes: Vec::new(),
            producers: Vec::new(),
            workers: Vec::new(),
        }
    }

    /// Appends a stage.  Nothing runs until [`process`](Self::process).
    pub fn add_pipe<F>(&mut self, pipe: F)
    where
        F: Fn(Consumer, Producer, LoggerHandle) + Send + Sync + 'static,
    {
        self.pipes.push(Arc::new(pipe));
    }

    /// Number of stages added so far.
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// `true` if no stages have been added.
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Fast-cancels the current run by erroring every internal channel.
    ///
    /// Every stage of the run observes an unwritable output and failing
    /// input reads; blocked readers wake with
    /// [`InsufficientData`](crate::InsufficientData).
    pub fn set_error(&self) {
        for producer in &self.producers {
            producer.set_error();
        }
    }

    /// Runs the pipeline over `input` and returns the consumer half of the
    /// final stage's channel.
    ///
    /// Workers from any previous run are joined first, so re-running a
    /// pipeline whose last run is still draining is safe.  With no stages the
    /// call degenerates to a passthrough: the caller gets a consumer over the
    /// input's own channel, closed so it reaches EoF once drained.
    ///
    /// In [`Async`](ExecutionMode::Async) mode the call returns immediately;
    /// in [`Sync`](ExecutionMode::Sync) mode it returns only after the final
    /// stage has completed inline and every worker has been joined.
    pub fn process(&mut self, input: Consumer, mode: ExecutionMode, logger: LoggerHandle) -> Consumer {
        self.wait_for_completion();

        if self.pipes.is_empty() {
            let passthrough = Producer::from(&input);
            passthrough.close();
            return passthrough.consumer();
        }

        // Fresh channels per run; a reused pipeline must not see leftovers.
        self.producers = (0..self.pipes.len()).map(|_| Producer::new()).collect();

        let pipes = self.pipes.clone();
        let last = pipes.len() - 1;
        for (i, pipe) in pipes.into_iter().enumerate() {
            let stage_in = if i == 0 {
                input.clone()
            } else {
                self.producers[i - 1].consumer()
            };
            let stage_out = self.producers[i].clone();

            if mode == ExecutionMode::Async || i < last {
                let logger = logger.clone();
                let worker = Builder::new()
                    .name(format!("bytepipe-stage-{i}"))
                    .spawn(move || pipe(stage_in, stage_out, logger))
                    .unwrap_or_else(|error| {
                        panic!("failed to spawn pipeline stage thread {i}: {error}")
                    });
                self.workers.push(worker);
            } else {
                // Sync mode, final stage: run in the caller's thread, then
                // join the upstream workers so "process returned" means
                // "pipeline finished".
                pipe(stage_in, stage_out, logger.clone());
                self.wait_for_completion();
            }
        }

        self.producers[last].consumer()
    }

    /// Joins and discards all outstanding workers.  Stages must not panic;
    /// if one did anyway, the panic stops at the join and is logged.
    fn wait_for_completion(&mut self) {
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().map(String::from);
            if worker.join().is_err() {
                warn!("pipeline stage thread {name:?} panicked");
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Pipeline {
    /// Clones the stage list and the current run's producers.  Workers are
    /// never cloned; the clone starts with none.
    fn clone(&self) -> Self {
        Self {
            pipes: self.pipes.clone(),
            producers: self.producers.clone(),
            workers: Vec::new(),
        }
    }
}

impl Drop for Pipeline {
    /// Joins every outstanding worker.  Detached stage threads could outlive
    /// the pipeline and its channels, so ownership ends here.
    fn drop(&mut self) {
        self.wait_for_completion();
    }
}

impl Debug for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.pipes.len())
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}

//! Resumable units of work that can be spread across host frames.
//!
//! A [`Task`] wraps a [`TaskWork`] implementation and drives it through
//! `Uninitialized -> Running -> Finished`:
//!
//! - The first [`StepTask::advance`] pulls inputs from upstream [`Handoff`]s and fixes the
//!   step count via [`TaskWork::prepare`], then executes the first step.
//! - Every further advance executes exactly one step.
//! - After the last step the output is published to the task's handoff and further advances
//!   are no-ops.
//!
//! Work that cannot be divided reports [`StepPolicy::Single`]; divisible work reports its
//! step count with [`StepPolicy::Divisible`]. A task with zero steps finishes on its first
//! advance without executing any work.
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::Result;

pub mod events;
pub mod handoff;
pub mod pipeline;

pub use events::{EventSink, TaskEvent, TaskEventKind};
pub use handoff::Handoff;
pub use pipeline::{Pipeline, PipelineProgress, RunMode};

/// Lifecycle state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskState {
    Uninitialized,
    Running,
    Finished,
}

/// How many steps a unit of work takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPolicy {
    /// Executes in one step.
    Single,
    /// Executes in the given number of steps.
    Divisible(usize),
}

impl StepPolicy {
    pub fn total_steps(self) -> usize {
        match self {
            StepPolicy::Single => 1,
            StepPolicy::Divisible(n) => n,
        }
    }

    /// Divisible policy covering `len` items in chunks of `chunk` (rounded up).
    pub fn chunked(len: usize, chunk: usize) -> Self {
        StepPolicy::Divisible(len.div_ceil(chunk.max(1)))
    }
}

/// Step counters for progress reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepProgress {
    pub total_steps: usize,
    pub executed_steps: usize,
}

impl StepProgress {
    pub fn remaining_steps(&self) -> usize {
        self.total_steps - self.executed_steps
    }

    /// Completed share in `[0, 1]`; `1.0` for zero-step work.
    pub fn fraction(&self) -> f32 {
        if self.total_steps == 0 {
            1.0
        } else {
            self.executed_steps as f32 / self.total_steps as f32
        }
    }
}

/// The work performed by a [`Task`].
pub trait TaskWork {
    type Output;

    fn name(&self) -> &str;

    /// Pulls inputs from upstream tasks and reports the step count. Called once, on the
    /// first advance.
    fn prepare(&mut self) -> Result<StepPolicy>;

    /// Executes step `step` of the count reported by [`TaskWork::prepare`].
    fn execute_step(&mut self, step: usize) -> Result<()>;

    /// Hands over the output once every step has run.
    fn finish(&mut self) -> Self::Output;
}

/// Type-erased driver interface shared by every task.
pub trait StepTask {
    fn name(&self) -> &str;

    fn state(&self) -> TaskState;

    fn progress(&self) -> StepProgress;

    /// Executes at most one step, reporting events to `sink`.
    fn advance_with_events(&mut self, sink: &mut dyn EventSink) -> Result<TaskState>;

    fn is_finished(&self) -> bool {
        self.state() == TaskState::Finished
    }

    /// Executes at most one step.
    fn advance(&mut self) -> Result<TaskState> {
        self.advance_with_events(&mut ())
    }

    /// Executes every remaining step in one call.
    fn run_with_events(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        while self.advance_with_events(sink)? != TaskState::Finished {}
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        self.run_with_events(&mut ())
    }
}

/// A resumable task around a [`TaskWork`].
pub struct Task<W: TaskWork> {
    work: W,
    state: TaskState,
    progress: StepProgress,
    output: Handoff<W::Output>,
}

impl<W: TaskWork> Task<W> {
    pub fn new(work: W) -> Self {
        Self {
            work,
            state: TaskState::Uninitialized,
            progress: StepProgress::default(),
            output: Handoff::new(),
        }
    }

    /// Handle downstream tasks use to read this task's output once it has finished.
    pub fn output(&self) -> Handoff<W::Output> {
        self.output.clone()
    }

    pub fn work(&self) -> &W {
        &self.work
    }

    /// The task output, or `None` while the task is unfinished.
    pub fn try_result(&self) -> Option<Arc<W::Output>> {
        self.output.get()
    }

    fn complete(&mut self, sink: &mut dyn EventSink) {
        self.state = TaskState::Finished;
        let output = self.work.finish();
        if !self.output.publish(Arc::new(output)) {
            warn!("Task '{}' output was already published.", self.work.name());
        }
        info!(
            "Task '{}' finished after {} steps.",
            self.work.name(),
            self.progress.executed_steps
        );
        if sink.wants(TaskEventKind::TaskFinished) {
            sink.send(TaskEvent::TaskFinished {
                task: self.work.name().to_owned(),
                executed_steps: self.progress.executed_steps,
            });
        }
    }
}

impl<W: TaskWork> Task<W>
where
    W::Output: Default,
{
    /// The task output.
    ///
    /// Reading before the task has finished logs a warning and returns a default value.
    pub fn result(&self) -> Arc<W::Output> {
        match self.output.get() {
            Some(output) => output,
            None => {
                warn!(
                    "Result of task '{}' read before it finished.",
                    self.work.name()
                );
                Arc::new(W::Output::default())
            }
        }
    }
}

impl<W: TaskWork> StepTask for Task<W> {
    fn name(&self) -> &str {
        self.work.name()
    }

    fn state(&self) -> TaskState {
        self.state
    }

    fn progress(&self) -> StepProgress {
        self.progress
    }

    fn advance_with_events(&mut self, sink: &mut dyn EventSink) -> Result<TaskState> {
        match self.state {
            TaskState::Finished => return Ok(TaskState::Finished),
            TaskState::Uninitialized => {
                let total_steps = self.work.prepare()?.total_steps();
                self.progress = StepProgress {
                    total_steps,
                    executed_steps: 0,
                };
                self.state = TaskState::Running;
                info!("Task '{}' started: {} steps.", self.work.name(), total_steps);
                if sink.wants(TaskEventKind::TaskStarted) {
                    sink.send(TaskEvent::TaskStarted {
                        task: self.work.name().to_owned(),
                        total_steps,
                    });
                }
                if total_steps == 0 {
                    warn!("Task '{}' has no steps; finishing.", self.work.name());
                    if sink.wants(TaskEventKind::Warning) {
                        sink.send(TaskEvent::Warning {
                            context: format!("task:{}", self.work.name()),
                            message: "Task has no steps".into(),
                        });
                    }
                    self.complete(sink);
                    return Ok(self.state);
                }
            }
            TaskState::Running => {}
        }

        let step = self.progress.executed_steps;
        self.work.execute_step(step)?;
        self.progress.executed_steps += 1;
        debug!(
            "Task '{}' step {}/{}.",
            self.work.name(),
            self.progress.executed_steps,
            self.progress.total_steps
        );
        if sink.wants(TaskEventKind::StepExecuted) {
            sink.send(TaskEvent::StepExecuted {
                task: self.work.name().to_owned(),
                step,
                progress: self.progress,
            });
        }

        if self.progress.remaining_steps() == 0 {
            self.complete(sink);
        }
        Ok(self.state)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use crate::task::events::VecSink;

    /// Sums a slice in chunks, one chunk per step.
    pub(crate) struct ChunkedSum {
        pub input: Handoff<Vec<u32>>,
        pub chunk: usize,
        pub values: Arc<Vec<u32>>,
        pub sum: u64,
        pub executed: Vec<usize>,
    }

    impl ChunkedSum {
        pub(crate) fn new(input: Handoff<Vec<u32>>, chunk: usize) -> Self {
            Self {
                input,
                chunk,
                values: Arc::default(),
                sum: 0,
                executed: Vec::new(),
            }
        }
    }

    impl TaskWork for ChunkedSum {
        type Output = u64;

        fn name(&self) -> &str {
            "Chunked Sum"
        }

        fn prepare(&mut self) -> Result<StepPolicy> {
            self.values = self.input.snapshot("Chunked Sum", "values")?;
            Ok(StepPolicy::chunked(self.values.len(), self.chunk))
        }

        fn execute_step(&mut self, step: usize) -> Result<()> {
            let start = step * self.chunk;
            let end = (start + self.chunk).min(self.values.len());
            self.sum += self.values[start..end].iter().map(|v| *v as u64).sum::<u64>();
            self.executed.push(step);
            Ok(())
        }

        fn finish(&mut self) -> u64 {
            self.sum
        }
    }

    fn hundred() -> Handoff<Vec<u32>> {
        Handoff::ready((1..=100).collect())
    }

    #[test]
    fn divisible_task_finishes_after_exactly_total_steps() {
        let mut task = Task::new(ChunkedSum::new(hundred(), 10));
        assert_eq!(task.state(), TaskState::Uninitialized);

        for i in 0..9 {
            assert_eq!(task.advance().expect("advance"), TaskState::Running, "call {i}");
        }
        assert!(!task.is_finished());
        assert_eq!(task.progress().remaining_steps(), 1);

        assert_eq!(task.advance().expect("advance"), TaskState::Finished);
        assert_eq!(task.progress().total_steps, 10);
        assert_eq!(task.work().executed, (0..10).collect::<Vec<_>>());
        assert_eq!(*task.result(), 5050);
    }

    #[test]
    fn finished_task_ignores_further_advances() {
        let mut task = Task::new(ChunkedSum::new(hundred(), 50));
        task.run().expect("run");
        assert!(task.is_finished());
        task.advance().expect("advance");
        task.advance().expect("advance");
        assert_eq!(task.work().executed.len(), 2);
        assert_eq!(task.progress().executed_steps, 2);
    }

    #[test]
    fn untouched_task_is_not_finished_and_result_defaults() {
        let task = Task::new(ChunkedSum::new(hundred(), 10));
        assert!(!task.is_finished());
        assert!(task.try_result().is_none());
        assert_eq!(*task.result(), 0);
    }

    #[test]
    fn zero_step_task_finishes_without_work() {
        let mut task = Task::new(ChunkedSum::new(Handoff::ready(Vec::new()), 10));
        let mut sink = VecSink::new();
        assert_eq!(
            task.advance_with_events(&mut sink).expect("advance"),
            TaskState::Finished
        );
        assert!(task.work().executed.is_empty());
        assert_eq!(task.try_result().as_deref(), Some(&0));
        assert!(sink
            .as_slice()
            .iter()
            .any(|e| matches!(e, TaskEvent::Warning { .. })));
    }

    #[test]
    fn missing_upstream_input_is_fatal_for_the_run() {
        let mut task = Task::new(ChunkedSum::new(Handoff::new(), 10));
        let err = task.advance().unwrap_err();
        assert!(matches!(err, Error::MissingInput { ref input, .. } if input == "values"));
        assert_eq!(task.state(), TaskState::Uninitialized);
    }

    #[test]
    fn output_handoff_is_published_on_finish() {
        let mut task = Task::new(ChunkedSum::new(hundred(), 100));
        let handoff = task.output();
        assert!(handoff.get().is_none());
        task.advance().expect("advance");
        assert_eq!(handoff.get().as_deref(), Some(&5050));
    }

    #[test]
    fn step_events_report_progress() {
        let mut task = Task::new(ChunkedSum::new(hundred(), 25));
        let mut sink = VecSink::new();
        task.run_with_events(&mut sink).expect("run");

        let steps: Vec<usize> = sink
            .as_slice()
            .iter()
            .filter_map(|e| match e {
                TaskEvent::StepExecuted { progress, .. } => Some(progress.executed_steps),
                _ => None,
            })
            .collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
        assert!(matches!(
            sink.as_slice().last(),
            Some(TaskEvent::TaskFinished {
                executed_steps: 4,
                ..
            })
        ));
    }
}

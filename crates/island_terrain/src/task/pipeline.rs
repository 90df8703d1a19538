//! Sequential driver for a chain of step tasks.
//!
//! A [`Pipeline`] owns its tasks in dependency order and advances only the first unfinished
//! one, so a task never starts before every task ahead of it has published its output.
//! Hosts call [`Pipeline::tick`] once per frame; [`Pipeline::run`] completes everything in
//! one call. Dropping a pipeline mid-run discards all partial work.
use tracing::{info, warn};

use crate::error::Result;
use crate::task::events::{EventSink, TaskEvent, TaskEventKind};
use crate::task::{StepProgress, StepTask};

/// How much work a single host tick performs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunMode {
    /// One step of the current task per tick.
    #[default]
    Stepped,
    /// The whole current task per tick.
    Atomic,
}

/// Snapshot of pipeline progress for host UIs.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineProgress {
    pub tasks_finished: usize,
    pub task_count: usize,
    /// Name of the task the next tick will advance.
    pub current_task: Option<String>,
    /// Step counters of the current task.
    pub current: StepProgress,
}

/// Ordered chain of tasks advanced one at a time.
pub struct Pipeline {
    name: String,
    tasks: Vec<Box<dyn StepTask>>,
    current: usize,
    started: bool,
    executed_steps: usize,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            current: 0,
            started: false,
            executed_steps: 0,
        }
    }

    /// Appends a task; it runs after every task added before it.
    pub fn push(&mut self, task: impl StepTask + 'static) {
        self.tasks.push(Box::new(task));
    }

    pub fn with_task(mut self, task: impl StepTask + 'static) -> Self {
        self.push(task);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.tasks.len()
    }

    pub fn progress(&self) -> PipelineProgress {
        let current = self.tasks.get(self.current);
        PipelineProgress {
            tasks_finished: self.current,
            task_count: self.tasks.len(),
            current_task: current.map(|t| t.name().to_owned()),
            current: current.map(|t| t.progress()).unwrap_or_default(),
        }
    }

    /// Executes one step of the first unfinished task. Returns `true` once all tasks finished.
    pub fn advance(&mut self) -> Result<bool> {
        self.advance_with_events(&mut ())
    }

    pub fn advance_with_events(&mut self, sink: &mut dyn EventSink) -> Result<bool> {
        self.tick_with_events(RunMode::Stepped, sink)
    }

    /// Performs one host tick worth of work in the given mode.
    pub fn tick(&mut self, mode: RunMode) -> Result<bool> {
        self.tick_with_events(mode, &mut ())
    }

    pub fn tick_with_events(&mut self, mode: RunMode, sink: &mut dyn EventSink) -> Result<bool> {
        if self.is_finished() {
            return Ok(true);
        }
        self.start(sink);

        let task = &mut self.tasks[self.current];
        let before = task.progress().executed_steps;
        let outcome = match mode {
            RunMode::Stepped => task.advance_with_events(sink).map(|_| ()),
            RunMode::Atomic => task.run_with_events(sink),
        };
        self.executed_steps += task.progress().executed_steps - before;
        outcome?;

        if task.is_finished() {
            self.current += 1;
            if self.is_finished() {
                self.finish(sink);
            }
        }
        Ok(self.is_finished())
    }

    /// Runs every remaining task to completion.
    pub fn run(&mut self) -> Result<()> {
        self.run_with_events(&mut ())
    }

    pub fn run_with_events(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        if self.tasks.is_empty() {
            warn!("Pipeline '{}' has no tasks.", self.name);
            if sink.wants(TaskEventKind::Warning) {
                sink.send(TaskEvent::Warning {
                    context: format!("pipeline:{}", self.name),
                    message: "Pipeline has no tasks".into(),
                });
            }
        }
        while !self.tick_with_events(RunMode::Atomic, sink)? {}
        Ok(())
    }

    fn start(&mut self, sink: &mut dyn EventSink) {
        if self.started {
            return;
        }
        self.started = true;
        info!(
            "Pipeline '{}' started: {} tasks.",
            self.name,
            self.tasks.len()
        );
        if sink.wants(TaskEventKind::PipelineStarted) {
            sink.send(TaskEvent::PipelineStarted {
                pipeline: self.name.clone(),
                task_count: self.tasks.len(),
            });
        }
    }

    fn finish(&mut self, sink: &mut dyn EventSink) {
        info!(
            "Pipeline '{}' finished: {} steps.",
            self.name, self.executed_steps
        );
        if sink.wants(TaskEventKind::PipelineFinished) {
            sink.send(TaskEvent::PipelineFinished {
                pipeline: self.name.clone(),
                executed_steps: self.executed_steps,
            });
        }
    }
}

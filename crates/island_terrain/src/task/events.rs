//! Event types and sinks for observing task and pipeline execution.
//!
//! This module defines [`TaskEvent`] and a set of sinks to emit, collect, or forward events
//! while advancing a [`crate::task::Task`] or a [`crate::task::Pipeline`]. Hosts typically
//! use them to drive progress bars.
use crate::task::StepProgress;

/// Describes events emitted while tasks execute.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// Emitted on the first advance of a pipeline.
    PipelineStarted {
        /// Pipeline name.
        pipeline: String,
        /// Number of tasks in the pipeline.
        task_count: usize,
    },

    /// Emitted when the last task of a pipeline finishes.
    PipelineFinished {
        /// Pipeline name.
        pipeline: String,
        /// Steps executed across all tasks.
        executed_steps: usize,
    },

    /// Emitted when a task pulled its inputs and knows its step count.
    TaskStarted {
        task: String,
        total_steps: usize,
    },

    /// Emitted after each executed step.
    StepExecuted {
        task: String,
        /// Zero-based index of the step that ran.
        step: usize,
        /// Counters after the step.
        progress: StepProgress,
    },

    /// Emitted when a task finished and published its output.
    TaskFinished {
        task: String,
        executed_steps: usize,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. task name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`TaskEvent`], used by sinks to filter what they receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskEventKind {
    PipelineStarted,
    PipelineFinished,
    TaskStarted,
    StepExecuted,
    TaskFinished,
    Warning,
}

impl TaskEvent {
    pub fn kind(&self) -> TaskEventKind {
        match self {
            TaskEvent::PipelineStarted { .. } => TaskEventKind::PipelineStarted,
            TaskEvent::PipelineFinished { .. } => TaskEventKind::PipelineFinished,
            TaskEvent::TaskStarted { .. } => TaskEventKind::TaskStarted,
            TaskEvent::StepExecuted { .. } => TaskEventKind::StepExecuted,
            TaskEvent::TaskFinished { .. } => TaskEventKind::TaskFinished,
            TaskEvent::Warning { .. } => TaskEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`TaskEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: TaskEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: TaskEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: TaskEvent) {}

    #[inline]
    fn wants(&self, _kind: TaskEventKind) -> bool {
        false
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    #[inline]
    fn send(&mut self, event: TaskEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: TaskEventKind) -> bool {
        (**self).wants(kind)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    #[inline]
    fn send(&mut self, event: TaskEvent) {
        (**self).send(event);
    }

    #[inline]
    fn wants(&self, kind: TaskEventKind) -> bool {
        (**self).wants(kind)
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(TaskEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(TaskEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(TaskEvent),
{
    #[inline]
    fn send(&mut self, event: TaskEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally limited to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<TaskEvent>,
    only: Option<Vec<TaskEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that keeps only events of the listed kinds.
    pub fn only(kinds: impl IntoIterator<Item = TaskEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<TaskEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[TaskEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: TaskEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: TaskEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: TaskEvent) {
        let kind = event.kind();
        for sink in self.sinks.iter_mut().filter(|s| s.wants(kind)) {
            sink.send(event.clone());
        }
    }

    fn wants(&self, kind: TaskEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

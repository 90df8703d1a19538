//! Write-once slots that pass task outputs downstream.
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};

/// Shared, write-once slot holding an immutable snapshot of a task output.
///
/// The producing task publishes once when it finishes; consumers take an `Arc` snapshot on
/// their first advance. Clones refer to the same slot.
pub struct Handoff<T> {
    slot: Arc<OnceLock<Arc<T>>>,
}

impl<T> Handoff<T> {
    /// Empty slot.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// Slot already holding `value`, for inputs produced outside the pipeline.
    pub fn ready(value: T) -> Self {
        let handoff = Self::new();
        handoff.publish(Arc::new(value));
        handoff
    }

    /// Stores `value`. Returns `false` if the slot was already filled.
    pub fn publish(&self, value: Arc<T>) -> bool {
        self.slot.set(value).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.get().cloned()
    }

    /// Snapshot for `task`, or [`Error::MissingInput`] naming `input` if nothing was published.
    pub fn snapshot(&self, task: &str, input: &str) -> Result<Arc<T>> {
        self.get().ok_or_else(|| Error::MissingInput {
            task: task.to_owned(),
            input: input.to_owned(),
        })
    }
}

impl<T> Clone for Handoff<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> Default for Handoff<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Handoff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handoff")
            .field("ready", &self.is_ready())
            .finish()
    }
}

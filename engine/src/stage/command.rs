//! Deferred commands for stage lifecycle operations.
//!
//! This module provides [`Commands`], a cloneable handle over a lock-free
//! queue of deferred stage operations. Code that cannot (or should not)
//! mutate the stage directly, such as a behavior hook deep in a callback
//! chain or a helper thread holding only a handle, submits commands instead,
//! and the stage applies them in FIFO order when [`Stage::update`] runs.
//!
//! # Overview
//!
//! Direct stage mutation requires `&mut Stage`. A destroy requested from
//! inside a behavior hook that is itself being driven by the stage would need
//! a second mutable borrow; a handle held elsewhere has no borrow at all. The
//! command queue turns both into deferred submissions:
//!
//! ```text
//! behavior hook ──destroy(id)──┐
//! setup script ──load_scene────┼──► Commands ──update()──► Stage
//! handle ──shutdown────────────┘
//! ```
//!
//! # Thread Safety
//!
//! Submission is lock-free and may happen from any thread holding a clone of
//! the handle. Draining happens on the stage's owning thread only.
//!
//! [`Stage::update`]: crate::stage::Stage::update

use std::sync::Arc;

use crossbeam::queue::SegQueue;

use crate::stage::ObjectId;

/// A deferred stage operation.
///
/// Commands are queued through a [`Commands`] handle and applied by the stage
/// in FIFO order. Each variant mirrors a direct stage method.
#[derive(Debug)]
pub enum Command {
    /// Destroy the object behind the handle.
    ///
    /// Dead or stale handles degrade to a no-op at apply time, so a command
    /// racing an earlier destroy is harmless.
    Destroy(ObjectId),

    /// Replace the current scene.
    ///
    /// Non-persistent objects are destroyed with the full notification path;
    /// persistent ones survive.
    LoadScene(String),

    /// Shut the stage down, destroying every remaining object.
    Shutdown,
}

/// Cloneable submitter handle over the stage's command queue.
///
/// All clones share one queue. Submissions are lock-free; the stage drains
/// the queue in [`Stage::update`](crate::stage::Stage::update) and applies
/// commands in the order they were pushed.
#[derive(Clone, Default)]
pub struct Commands {
    queue: Arc<SegQueue<Command>>,
}

impl Commands {
    /// Create a handle over a fresh, empty queue.
    pub fn new() -> Self {
        Self {
            queue: Arc::new(SegQueue::new()),
        }
    }

    /// Push a raw command onto the queue.
    pub fn push(&self, command: Command) {
        self.queue.push(command);
    }

    /// Request destruction of the object behind the handle.
    pub fn destroy(&self, object: ObjectId) {
        self.push(Command::Destroy(object));
    }

    /// Request a scene change.
    pub fn load_scene(&self, name: impl Into<String>) {
        self.push(Command::LoadScene(name.into()));
    }

    /// Request a stage shutdown.
    pub fn shutdown(&self) {
        self.push(Command::Shutdown);
    }

    /// Number of commands waiting to be applied.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// `true` if no commands are waiting.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain all pending commands in FIFO order.
    ///
    /// Called by the stage from `update`; commands pushed while the drained
    /// batch is being applied land in the next batch.
    pub(crate) fn drain(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Some(command) = self.queue.pop() {
            commands.push(command);
        }
        commands
    }
}

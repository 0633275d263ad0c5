//! Lifecycle state for a stage.
//!
//! A stage is [`Running`](State::Running) from the moment it is constructed;
//! there is no separate boot phase. Shutdown moves it through
//! [`Stopping`](State::Stopping) while the remaining objects are torn down and
//! leaves it at [`Stopped`](State::Stopped), which is terminal.

/// Enumeration of possible states a stage can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The stage is in normal operation: objects can be spawned and
    /// singleton instances created.
    Running,
    /// Shutdown has begun; the remaining objects are being destroyed.
    Stopping,
    /// The stage has fully stopped and holds no live objects.
    Stopped,
}

impl State {
    /// `true` while the stage accepts new objects and singleton creation.
    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, State::Running)
    }

    /// `true` once shutdown has begun or completed.
    #[inline]
    pub fn is_closing(self) -> bool {
        !self.is_live()
    }
}

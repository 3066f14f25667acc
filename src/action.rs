//! Bridge from resolved bindings to host commands
//!
//! The dispatcher never executes anything itself: it hands action ids to an
//! [`ActionInvoker`] supplied by the host, together with whatever execution
//! context the host passed when the session started.

/// Failure reported by the host while invoking an action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("action `{action}` failed: {reason}")]
    Failed { action: String, reason: String },
}

/// Executes host commands by id
///
/// Invocation is fire-and-forget from the caller's point of view: the host
/// may schedule work and return immediately.
pub trait ActionInvoker {
    /// Ambient data the host needs to run an action (focused editor,
    /// project handle, ...)
    type Context;

    fn invoke(&mut self, action_id: &str, context: &Self::Context) -> Result<(), InvokeError>;
}

/// Most recently invoked leader action, for "repeat last command"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastCommandMemory {
    latest: Option<String>,
}

impl LastCommandMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    pub fn set(&mut self, action_id: impl Into<String>) {
        self.latest = Some(action_id.into());
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}

//! leaderkey - Spacemacs-style leader key bindings for editor hosts
//!
//! Press a leader key, then a short sequence of single-character keys that
//! walks a tree of groups down to an action. The host supplies raw key
//! events and an [`ActionInvoker`]; this crate loads the tree from a YAML rc
//! file and runs the state machine.

pub mod action;
pub mod app;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod keymap;
pub mod tracing;

// Re-export commonly used types
pub use action::{ActionInvoker, InvokeError, LastCommandMemory};
pub use app::LeaderKey;
pub use config::ConfigService;
pub use keymap::{Binding, BindingTree, ConfigError, DispatchEvent, Dispatcher, FocusContext};

//! Leader-key bindings and dispatch
//!
//! This module provides a data-driven leader key system that:
//! - Loads a tree of bindings from a YAML rc file
//! - Merges product-specific overrides onto a common tree
//! - Normalizes host key events into comparable descriptors
//! - Walks the tree one keystroke at a time and fires host actions
//!
//! # Architecture
//!
//! ```text
//! host key event → RawKeyEvent → KeyDescriptor → Dispatcher → ActionInvoker
//! ```
//!
//! # Loading Bindings
//!
//! ```ignore
//! let tree = load_config_file(&rc_path, Some("IC"))?;
//! let mut dispatcher = Dispatcher::new(invoker);
//! dispatcher.start(tree, context);
//! ```

mod binding;
mod config;
mod context;
mod defaults;
mod dispatcher;
mod event;
mod layout;
mod merge;
mod types;
#[cfg(feature = "winit")]
mod winit_adapter;

pub use binding::{
    sibling_order, Binding, BindingTree, GroupBinding, InvalidBindingError, TerminalBinding,
};
pub use config::{
    key_for_label, load_config_file, load_config_str, parse_bindings, parse_config,
    parse_document, ConfigError, ACTION_ID_KEYWORD, BINDINGS_KEYWORD, DESCRIPTION_KEYWORD,
};
pub use context::FocusContext;
pub use defaults::{default_bindings, find_or_create_rc_file, DEFAULT_RC_YAML, RC_FILE_NAME};
pub use dispatcher::{DispatchEvent, Dispatcher, KeyOutcome, ListenerId};
pub use event::{normalize_key_event, RawEventKind, RawKeyEvent};
pub use layout::key_for_char;
pub use merge::merge_bindings;
pub use types::{KeyCode, KeyDescriptor, KeyPhase, Modifiers};
#[cfg(feature = "winit")]
pub use winit_adapter::raw_key_event_from_winit;

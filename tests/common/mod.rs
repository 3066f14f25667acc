//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use leaderkey::keymap::{load_config_str, KeyCode, Modifiers, RawKeyEvent, RC_FILE_NAME};
use leaderkey::{ActionInvoker, BindingTree, DispatchEvent, Dispatcher, InvokeError};

/// Config used by most dispatch tests
pub const SAMPLE_RC: &str = r#"
bindings:
  q:
    description: Session...
    bindings:
      f: { actionId: OpenConfig, description: Open config }
      q: { actionId: Exit, description: Exit }
  w: { actionId: [SplitVertically, Unsplit], description: Split and unsplit }
  "?": { actionId: ShowHelp, description: Help }
  F2: { actionId: Rename, description: Rename }
"#;

pub fn sample_tree() -> BindingTree {
    load_config_str(SAMPLE_RC, None).expect("sample config should parse")
}

/// Invoker that records action ids and fails on request
#[derive(Debug, Default)]
pub struct RecordingInvoker {
    pub invoked: Vec<String>,
    pub failing: HashSet<String>,
}

impl RecordingInvoker {
    pub fn failing_on(action_id: &str) -> Self {
        Self {
            failing: HashSet::from([action_id.to_string()]),
            ..Self::default()
        }
    }
}

impl ActionInvoker for RecordingInvoker {
    type Context = ();

    fn invoke(&mut self, action_id: &str, _context: &()) -> Result<(), InvokeError> {
        self.invoked.push(action_id.to_string());
        if self.failing.contains(action_id) {
            return Err(InvokeError::Failed {
                action: action_id.to_string(),
                reason: "test failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Dispatcher with a recorder attached to its notifications
pub fn recording_dispatcher() -> (Dispatcher<RecordingInvoker>, Rc<RefCell<Vec<DispatchEvent>>>) {
    let mut dispatcher = Dispatcher::new(RecordingInvoker::default());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    dispatcher.add_listener(move |e| sink.borrow_mut().push(e.clone()));
    (dispatcher, events)
}

/// Press and release the key typing `c`; returns whether each was consumed
pub fn tap<I: ActionInvoker>(dispatcher: &mut Dispatcher<I>, c: char) -> (bool, bool) {
    (
        dispatcher.handle_key_event(&RawKeyEvent::press_char(c)),
        dispatcher.handle_key_event(&RawKeyEvent::release_char(c)),
    )
}

/// Press and release a non-character key
pub fn tap_code<I: ActionInvoker>(dispatcher: &mut Dispatcher<I>, code: KeyCode) -> (bool, bool) {
    (
        dispatcher.handle_key_event(&RawKeyEvent::press(code, Modifiers::NONE)),
        dispatcher.handle_key_event(&RawKeyEvent::release(code, Modifiers::NONE)),
    )
}

/// Write `text` as the rc file in `dir`
pub fn write_rc(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join(RC_FILE_NAME);
    std::fs::write(&path, text).expect("write rc file");
    path
}

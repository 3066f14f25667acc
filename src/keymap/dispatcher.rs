//! Leader-key dispatch state machine
//!
//! While a session is active the dispatcher captures every key event,
//! resolves it against the current level of the binding tree and either
//! descends into a group, fires a terminal binding or dismisses.
//!
//! ```text
//! Idle --start--> Capturing(root) --group--> Capturing(children) ...
//!                      |                           |
//!                      +--terminal / escape / stop-+--> Idle
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver};

use super::binding::{Binding, BindingTree, GroupBinding, TerminalBinding};
use super::event::{normalize_key_event, RawEventKind, RawKeyEvent};
use super::types::{KeyCode, KeyDescriptor, KeyPhase};
use crate::action::{ActionInvoker, InvokeError, LastCommandMemory};

/// Notifications for the UI that mirrors the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchEvent {
    /// A group was opened; the session continues one level down
    GroupEntered(GroupBinding),
    /// A terminal binding fired its actions; the session is over
    TerminalFired(TerminalBinding),
    /// The session ended without firing (escape or external stop)
    Dismissed,
}

/// Handle returned by [`Dispatcher::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What the dispatcher did with a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No session is active; the event belongs to the host
    Ignored,
    /// Swallowed without effect (modifier, typed char, held group key release)
    Consumed,
    /// Swallowed; nothing at this level matches
    NoMatch,
    EnteredGroup,
    Fired,
    Dismissed,
}

impl KeyOutcome {
    /// Whether the host must stop propagating the event
    pub fn is_consumed(self) -> bool {
        self != KeyOutcome::Ignored
    }
}

type Listener = Box<dyn FnMut(&DispatchEvent)>;

/// One leader-key invocation
struct Session<C> {
    node: BindingTree,
    key_index: HashMap<KeyDescriptor, usize>,
    char_index: HashMap<char, usize>,
    context: C,
    /// Labels of the groups entered so far
    path: Vec<String>,
    /// Group-opening keys still held down; their releases are not new keystrokes
    held_openers: HashSet<KeyCode>,
}

impl<C> Session<C> {
    fn new(node: BindingTree, context: C) -> Self {
        Self {
            key_index: node.key_index(),
            char_index: node.char_index(),
            node,
            context,
            path: Vec::new(),
            held_openers: HashSet::new(),
        }
    }

    fn descend(&mut self, group: &GroupBinding, opened_by: KeyDescriptor) {
        self.node = group.children().clone();
        self.key_index = self.node.key_index();
        self.char_index = self.node.char_index();
        self.path.push(group.label().to_string());
        if opened_by.phase == KeyPhase::Press {
            self.held_openers.insert(opened_by.code);
        }
    }

    /// Exact descriptor first, then the typed character, restricted to
    /// bindings that trigger on the same phase as the event
    fn resolve(&self, stroke: &KeyDescriptor, character: Option<char>) -> Option<&Binding> {
        if let Some(&idx) = self.key_index.get(stroke) {
            return Some(&self.node[idx]);
        }

        let idx = *self.char_index.get(&character?)?;
        let binding = &self.node[idx];
        (binding.key().phase == stroke.phase).then_some(binding)
    }
}

enum DispatchState<C> {
    Idle,
    Capturing(Session<C>),
}

/// Leader-key state machine
///
/// Owns the host's [`ActionInvoker`] and the last-command memory. Only one
/// session exists at a time; starting a new one dismisses the current one.
pub struct Dispatcher<I: ActionInvoker> {
    invoker: I,
    state: DispatchState<I::Context>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
    last_command: LastCommandMemory,
}

impl<I: ActionInvoker> Dispatcher<I> {
    pub fn new(invoker: I) -> Self {
        Self {
            invoker,
            state: DispatchState::Idle,
            listeners: Vec::new(),
            next_listener_id: 0,
            last_command: LastCommandMemory::new(),
        }
    }

    /// Begin capturing keys against `bindings`
    ///
    /// Call this before showing any UI so that no keystroke typed while the
    /// popup opens is lost.
    pub fn start(&mut self, bindings: BindingTree, context: I::Context) {
        if self.is_capturing() {
            self.stop();
        }

        tracing::debug!("Leader session started with {} bindings", bindings.len());
        self.state = DispatchState::Capturing(Session::new(bindings, context));
    }

    /// End the session, if any. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let DispatchState::Capturing(_) = std::mem::replace(&mut self.state, DispatchState::Idle)
        {
            tracing::debug!("Leader session dismissed");
            self.emit(DispatchEvent::Dismissed);
        }
    }

    /// Feed a key event; returns whether the host must consume it
    pub fn handle_key_event(&mut self, event: &RawKeyEvent) -> bool {
        self.process_key_event(event).is_consumed()
    }

    /// Feed a key event and report what happened
    pub fn process_key_event(&mut self, event: &RawKeyEvent) -> KeyOutcome {
        let DispatchState::Capturing(session) = &mut self.state else {
            return KeyOutcome::Ignored;
        };

        let Some(stroke) = normalize_key_event(event) else {
            return KeyOutcome::Consumed;
        };

        if stroke.is_escape() {
            if stroke.phase == KeyPhase::Press {
                self.stop();
                return KeyOutcome::Dismissed;
            }
            return KeyOutcome::Consumed;
        }

        // The key-down/key-up pair carries the gesture
        if event.kind == RawEventKind::Typed {
            return KeyOutcome::Consumed;
        }

        if stroke.phase == KeyPhase::Release && session.held_openers.remove(&stroke.code) {
            return KeyOutcome::Consumed;
        }

        let Some(binding) = session.resolve(&stroke, event.character).cloned() else {
            tracing::trace!(key = %stroke, "No leader binding at this level");
            return KeyOutcome::NoMatch;
        };

        match binding {
            Binding::Terminal(terminal) => {
                self.fire(terminal);
                KeyOutcome::Fired
            }
            Binding::Group(group) => {
                session.descend(&group, stroke);
                tracing::debug!(
                    "Entered leader group {} ({} bindings)",
                    group.label(),
                    group.children().len()
                );
                self.emit(DispatchEvent::GroupEntered(group));
                KeyOutcome::EnteredGroup
            }
        }
    }

    fn fire(&mut self, terminal: TerminalBinding) {
        let DispatchState::Capturing(session) = std::mem::replace(&mut self.state, DispatchState::Idle)
        else {
            return;
        };

        for action in terminal.actions() {
            tracing::debug!("Invoking leader action {}", action);
            if let Err(e) = self.invoker.invoke(action, &session.context) {
                tracing::warn!("Leader action {} failed: {}", action, e);
            }
        }
        if let Some(last) = terminal.actions().last() {
            self.last_command.set(last.as_str());
        }

        self.emit(DispatchEvent::TerminalFired(terminal));
    }

    /// Run the most recently fired action again
    ///
    /// Returns `None` if no leader action has run yet.
    pub fn repeat_last_command(&mut self, context: &I::Context) -> Option<Result<(), InvokeError>> {
        let action = self.last_command.get()?.to_string();
        tracing::debug!("Repeating leader action {}", action);
        Some(self.invoker.invoke(&action, context))
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&DispatchEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was not registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Receive dispatch events over a channel instead of a callback
    pub fn subscribe(&mut self) -> Receiver<DispatchEvent> {
        let (tx, rx) = mpsc::channel();
        self.add_listener(move |event| {
            let _ = tx.send(event.clone());
        });
        rx
    }

    fn emit(&mut self, event: DispatchEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, DispatchState::Capturing(_))
    }

    /// Bindings the next keystroke is matched against
    pub fn current_node(&self) -> Option<&BindingTree> {
        match &self.state {
            DispatchState::Capturing(session) => Some(&session.node),
            DispatchState::Idle => None,
        }
    }

    /// Labels of the groups entered in the current session
    pub fn path(&self) -> &[String] {
        match &self.state {
            DispatchState::Capturing(session) => &session.path,
            DispatchState::Idle => &[],
        }
    }

    pub fn context(&self) -> Option<&I::Context> {
        match &self.state {
            DispatchState::Capturing(session) => Some(&session.context),
            DispatchState::Idle => None,
        }
    }

    pub fn last_command(&self) -> &LastCommandMemory {
        &self.last_command
    }

    pub fn last_command_mut(&mut self) -> &mut LastCommandMemory {
        &mut self.last_command
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    pub fn invoker_mut(&mut self) -> &mut I {
        &mut self.invoker
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::keymap::config::load_config_str;
    use crate::keymap::types::Modifiers;

    #[derive(Default)]
    struct Recorder {
        invoked: Vec<String>,
        failing: Option<String>,
    }

    impl ActionInvoker for Recorder {
        type Context = ();

        fn invoke(&mut self, action_id: &str, _context: &()) -> Result<(), InvokeError> {
            self.invoked.push(action_id.to_string());
            if self.failing.as_deref() == Some(action_id) {
                return Err(InvokeError::Failed {
                    action: action_id.to_string(),
                    reason: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    const CONFIG: &str = r#"
bindings:
  q:
    description: Session...
    bindings:
      f: { actionId: Open, description: Open }
      q: { actionId: Quit, description: Quit }
  w: { actionId: [SplitVertically, Unsplit], description: Split }
  R: { actionId: Rename, description: Rename }
"#;

    fn dispatcher() -> (Dispatcher<Recorder>, Rc<RefCell<Vec<DispatchEvent>>>) {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        dispatcher.add_listener(move |e| sink.borrow_mut().push(e.clone()));
        dispatcher.start(load_config_str(CONFIG, None).unwrap(), ());
        (dispatcher, events)
    }

    #[test]
    fn test_idle_ignores_events() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        assert!(!dispatcher.handle_key_event(&RawKeyEvent::press_char('q')));
        assert!(!dispatcher.is_capturing());
    }

    #[test]
    fn test_group_then_terminal() {
        let (mut dispatcher, events) = dispatcher();

        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::press_char('q')),
            KeyOutcome::EnteredGroup
        );
        assert_eq!(dispatcher.path(), ["q".to_string()]);
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::release_char('f')),
            KeyOutcome::Fired
        );

        assert!(!dispatcher.is_capturing());
        assert_eq!(dispatcher.invoker().invoked, vec!["Open"]);
        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], DispatchEvent::GroupEntered(g) if g.label() == "q"));
        assert!(matches!(&events[1], DispatchEvent::TerminalFired(t) if t.label() == "f"));
    }

    #[test]
    fn test_release_of_group_key_is_swallowed() {
        let (mut dispatcher, _) = dispatcher();
        dispatcher.handle_key_event(&RawKeyEvent::press_char('q'));
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::release_char('q')),
            KeyOutcome::Consumed
        );
        assert!(dispatcher.is_capturing());

        dispatcher.handle_key_event(&RawKeyEvent::press_char('q'));
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::release_char('q')),
            KeyOutcome::Fired
        );
        assert_eq!(dispatcher.invoker().invoked, vec!["Quit"]);
    }

    #[test]
    fn test_held_group_key_release_is_swallowed_one_level_down() {
        let tree = load_config_str(
            "bindings:\n  q:\n    bindings:\n      w:\n        bindings:\n          q: { actionId: Deep }\n",
            None,
        )
        .unwrap();
        let mut dispatcher = Dispatcher::new(Recorder::default());
        dispatcher.start(tree, ());

        dispatcher.handle_key_event(&RawKeyEvent::press_char('q'));
        dispatcher.handle_key_event(&RawKeyEvent::press_char('w'));
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::release_char('q')),
            KeyOutcome::Consumed
        );
        assert!(dispatcher.is_capturing());
        assert!(dispatcher.invoker().invoked.is_empty());
    }

    #[test]
    fn test_terminal_waits_for_release() {
        let (mut dispatcher, _) = dispatcher();
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::press_char('w')),
            KeyOutcome::NoMatch
        );
        assert!(dispatcher.invoker().invoked.is_empty());
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::release_char('w')),
            KeyOutcome::Fired
        );
        assert_eq!(dispatcher.invoker().invoked, vec!["SplitVertically", "Unsplit"]);
        assert_eq!(dispatcher.last_command().get(), Some("Unsplit"));
    }

    #[test]
    fn test_shifted_terminal() {
        let (mut dispatcher, _) = dispatcher();
        assert!(dispatcher.handle_key_event(&RawKeyEvent::press(KeyCode::Shift, Modifiers::SHIFT)));
        dispatcher.handle_key_event(&RawKeyEvent::press_char('R'));
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::release_char('R')),
            KeyOutcome::Fired
        );
        assert_eq!(dispatcher.invoker().invoked, vec!["Rename"]);
    }

    #[test]
    fn test_char_fallback_respects_phase() {
        let (mut dispatcher, _) = dispatcher();
        // A layout where `R` comes from an unexpected key still resolves by character
        let odd_release = RawKeyEvent::new(RawEventKind::Up, KeyCode::F(13), Modifiers::NONE, Some('R'));
        let odd_press = RawKeyEvent { kind: RawEventKind::Down, ..odd_release };

        assert_eq!(dispatcher.process_key_event(&odd_press), KeyOutcome::NoMatch);
        assert_eq!(dispatcher.process_key_event(&odd_release), KeyOutcome::Fired);
        assert_eq!(dispatcher.invoker().invoked, vec!["Rename"]);
    }

    #[test]
    fn test_escape_dismisses_from_nested_group() {
        let (mut dispatcher, events) = dispatcher();
        dispatcher.handle_key_event(&RawKeyEvent::press_char('q'));
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::press(KeyCode::Escape, Modifiers::NONE)),
            KeyOutcome::Dismissed
        );
        assert!(!dispatcher.is_capturing());
        assert_eq!(events.borrow().last(), Some(&DispatchEvent::Dismissed));
        assert!(dispatcher.invoker().invoked.is_empty());
    }

    #[test]
    fn test_typed_events_are_consumed_without_matching() {
        let (mut dispatcher, events) = dispatcher();
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::typed('w')),
            KeyOutcome::Consumed
        );
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_failed_action_still_ends_session() {
        let mut dispatcher = Dispatcher::new(Recorder {
            failing: Some("SplitVertically".to_string()),
            ..Recorder::default()
        });
        dispatcher.start(load_config_str(CONFIG, None).unwrap(), ());
        assert_eq!(
            dispatcher.process_key_event(&RawKeyEvent::release_char('w')),
            KeyOutcome::Fired
        );
        assert!(!dispatcher.is_capturing());
        assert_eq!(dispatcher.invoker().invoked, vec!["SplitVertically", "Unsplit"]);
    }

    #[test]
    fn test_start_dismisses_previous_session() {
        let (mut dispatcher, events) = dispatcher();
        dispatcher.handle_key_event(&RawKeyEvent::press_char('q'));
        dispatcher.start(BindingTree::empty(), ());
        assert!(dispatcher.is_capturing());
        assert!(dispatcher.path().is_empty());
        assert_eq!(events.borrow().last(), Some(&DispatchEvent::Dismissed));
    }

    #[test]
    fn test_repeat_last_command() {
        let (mut dispatcher, _) = dispatcher();
        assert!(dispatcher.repeat_last_command(&()).is_none());
        dispatcher.handle_key_event(&RawKeyEvent::release_char('R'));
        assert_eq!(dispatcher.repeat_last_command(&()), Some(Ok(())));
        assert_eq!(dispatcher.invoker().invoked, vec!["Rename", "Rename"]);
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let id = dispatcher.add_listener(move |_| *counter.borrow_mut() += 1);
        assert!(dispatcher.remove_listener(id));
        assert!(!dispatcher.remove_listener(id));

        dispatcher.start(BindingTree::empty(), ());
        dispatcher.stop();
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_subscribe_receives_events() {
        let mut dispatcher = Dispatcher::new(Recorder::default());
        let rx = dispatcher.subscribe();
        dispatcher.start(BindingTree::empty(), ());
        dispatcher.stop();
        assert_eq!(rx.try_recv(), Ok(DispatchEvent::Dismissed));
        assert!(rx.try_recv().is_err());
    }
}

//! Host-facing entry point tying configuration and dispatch together

use crate::action::{ActionInvoker, InvokeError};
use crate::config::ConfigService;
use crate::keymap::{BindingTree, ConfigError, Dispatcher, FocusContext, KeyOutcome, RawKeyEvent};

/// Leader-key application context, owned by the host's UI thread
pub struct LeaderKey<I: ActionInvoker> {
    config: ConfigService,
    dispatcher: Dispatcher<I>,
}

impl<I: ActionInvoker> LeaderKey<I> {
    pub fn new(config: ConfigService, invoker: I) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::new(invoker),
        }
    }

    /// Handle the leader gesture
    ///
    /// Returns false, without starting a session, when focus is in a text
    /// input or a speed-search popup.
    pub fn trigger(&mut self, context: I::Context, focus: &FocusContext) -> bool {
        if !focus.leader_enabled() {
            tracing::debug!("Leader key disabled in current focus: {:?}", focus);
            return false;
        }

        let bindings = self.config.bindings().clone();
        self.dispatcher.start(bindings, context);
        true
    }

    /// Reload bindings from the rc file; an active session keeps its tree
    pub fn reload(&mut self) -> Result<&BindingTree, ConfigError> {
        self.config.reload()
    }

    pub fn handle_key_event(&mut self, event: &RawKeyEvent) -> bool {
        self.dispatcher.handle_key_event(event)
    }

    pub fn process_key_event(&mut self, event: &RawKeyEvent) -> KeyOutcome {
        self.dispatcher.process_key_event(event)
    }

    pub fn stop(&mut self) {
        self.dispatcher.stop();
    }

    pub fn repeat_last_command(&mut self, context: &I::Context) -> Option<Result<(), InvokeError>> {
        self.dispatcher.repeat_last_command(context)
    }

    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigService {
        &mut self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher<I> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<I> {
        &mut self.dispatcher
    }
}

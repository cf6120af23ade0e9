use std::rc::Rc;

use log::{info, warn};
use thiserror::Error;

use crate::classify::is_non_deterministic;
use crate::model::Automaton;
use crate::publish::{Latest, SubscriptionId};
use crate::subset::{convert_to_dfa_with, Config};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("the automaton is deterministic, a non-deterministic automaton is required")]
    Deterministic,
}

/// Holds the automaton under edit and the last conversion result, and notifies
/// subscribers whenever either changes.
#[derive(Debug, Default)]
pub struct Workbench {
    config: Config,
    nfa: Latest<Automaton>,
    dfa: Latest<Automaton>,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_automaton(&mut self, automaton: Automaton) -> Rc<Automaton> {
        self.nfa.publish(automaton)
    }

    /// Accepts `automaton` as the current NFA only if it is actually non-deterministic.
    pub fn submit(&mut self, automaton: Automaton) -> Result<Rc<Automaton>, SubmitError> {
        if !is_non_deterministic(&automaton) {
            info!(
                "rejected deterministic automaton with {} states",
                automaton.states.len()
            );
            return Err(SubmitError::Deterministic);
        }
        Ok(self.set_automaton(automaton))
    }

    // determinism is not rechecked here
    pub fn convert(&mut self, automaton: &Automaton) -> Rc<Automaton> {
        let dangling = automaton.dangling_references();
        if !dangling.is_empty() {
            warn!(
                "transitions reference undeclared states {:?}, they keep their moves but are never final",
                dangling
            );
        }

        let conflicting = automaton.conflicting_ids(&self.config);
        if !conflicting.is_empty() {
            warn!(
                "state ids {:?} clash with the sink id '{}' or separator '{}', composite ids may collide",
                conflicting,
                self.config.error_state(),
                self.config.separator()
            );
        }

        let dfa = convert_to_dfa_with(automaton, &self.config);
        self.dfa.publish(dfa)
    }

    pub fn latest_nfa(&self) -> Option<Rc<Automaton>> {
        self.nfa.get()
    }

    pub fn latest_dfa(&self) -> Option<Rc<Automaton>> {
        self.dfa.get()
    }

    pub fn subscribe_nfa<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&Rc<Automaton>) + 'static,
    {
        self.nfa.subscribe(subscriber)
    }

    pub fn subscribe_dfa<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&Rc<Automaton>) + 'static,
    {
        self.dfa.subscribe(subscriber)
    }

    pub fn unsubscribe_nfa(&mut self, id: SubscriptionId) -> bool {
        self.nfa.unsubscribe(id)
    }

    pub fn unsubscribe_dfa(&mut self, id: SubscriptionId) -> bool {
        self.dfa.unsubscribe(id)
    }
}

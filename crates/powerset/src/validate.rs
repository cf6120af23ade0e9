use std::collections::HashSet;

use thiserror::Error;

use crate::model::Automaton;
use crate::subset::Config;

// Referential checks are opt-in. classify, closure and subset construction never call into
// this module; an unresolved id is interned like any other, keeps its outgoing moves and is
// never final.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("state id '{0}' is declared more than once")]
    DuplicateState(String),
    #[error("state id '{id}' contains the composite separator '{separator}'")]
    SeparatorInId { id: String, separator: String },
    #[error("state id '{0}' is reserved for the sink state")]
    ReservedId(String),
    #[error("no state is marked initial")]
    NoInitialState,
    #[error("more than one state is marked initial: '{0}' and '{1}'")]
    MultipleInitialStates(String, String),
    #[error("transition '{from}' --{symbol}--> '{to}' references undeclared state '{missing}'")]
    UnknownState {
        from: String,
        to: String,
        symbol: String,
        missing: String,
    },
}

// a composite id is its members joined by the separator, so a member that already carries
// the separator, or that is named like the sink, can produce the same id as another DFA state
fn carries_separator(id: &str, config: &Config) -> bool {
    !config.separator().is_empty() && id.contains(config.separator())
}

fn conflicts(id: &str, config: &Config) -> bool {
    id == config.error_state() || carries_separator(id, config)
}

impl Automaton {
    pub fn validate(&self) -> Result<(), ModelError> {
        self.validate_with(&Config::default())
    }

    /// Like [`Automaton::validate`], checking state ids against the sink id and separator of
    /// `config` instead of the defaults.
    pub fn validate_with(&self, config: &Config) -> Result<(), ModelError> {
        let mut declared: HashSet<&str> = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !declared.insert(state.id.as_str()) {
                return Err(ModelError::DuplicateState(state.id.clone()));
            }
            if state.id == config.error_state() {
                return Err(ModelError::ReservedId(state.id.clone()));
            }
            if carries_separator(&state.id, config) {
                return Err(ModelError::SeparatorInId {
                    id: state.id.clone(),
                    separator: config.separator().to_string(),
                });
            }
        }

        let mut initials = self.states.iter().filter(|s| s.is_initial);
        match (initials.next(), initials.next()) {
            (None, _) => return Err(ModelError::NoInitialState),
            (Some(a), Some(b)) => {
                return Err(ModelError::MultipleInitialStates(a.id.clone(), b.id.clone()))
            }
            (Some(_), None) => {}
        }

        for t in &self.transitions {
            for endpoint in [&t.from, &t.to] {
                if !declared.contains(endpoint.as_str()) {
                    return Err(ModelError::UnknownState {
                        from: t.from.clone(),
                        to: t.to.clone(),
                        symbol: t.symbol.to_string(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Every transition endpoint that names no declared state, deduplicated, in first-seen order.
    pub fn dangling_references(&self) -> Vec<&str> {
        let declared: HashSet<&str> = self.states.iter().map(|s| s.id.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut dangling = Vec::new();

        for t in &self.transitions {
            for endpoint in [t.from.as_str(), t.to.as_str()] {
                if !declared.contains(endpoint) && seen.insert(endpoint) {
                    dangling.push(endpoint);
                }
            }
        }

        dangling
    }

    /// Every id, declared or only referenced, that equals the sink id or contains the
    /// separator of `config`. Converting with such ids can give two DFA states one id.
    pub fn conflicting_ids(&self, config: &Config) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let states = self.states.iter().map(|s| s.id.as_str());
        let endpoints = self
            .transitions
            .iter()
            .flat_map(|t| [t.from.as_str(), t.to.as_str()]);

        states
            .chain(endpoints)
            .filter(|id| conflicts(id, config) && seen.insert(*id))
            .collect()
    }
}

use std::collections::{HashMap, HashSet};

use crate::model::{Automaton, Label};

/// True when some (state, symbol) pair reaches more than one destination, or when any
/// epsilon transition is present at all. An automaton without transitions is deterministic.
pub fn is_non_deterministic(automaton: &Automaton) -> bool {
    let mut destinations: HashMap<(&str, &Label), HashSet<&str>> = HashMap::new();

    for t in &automaton.transitions {
        let targets = destinations.entry((t.from.as_str(), &t.symbol)).or_default();
        targets.insert(t.to.as_str());
        if targets.len() > 1 {
            return true;
        }
    }

    automaton.transitions.iter().any(|t| t.symbol.is_epsilon())
}

impl Automaton {
    pub fn is_non_deterministic(&self) -> bool {
        is_non_deterministic(self)
    }
}

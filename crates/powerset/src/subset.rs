use std::collections::{HashMap, VecDeque};

use bit_set::BitSet;
use log::{debug, trace};

use crate::closure::Closures;
use crate::graph::{StateGraph, StateIdx, SymbolIdx};
use crate::model::{Automaton, Label, State, Transition};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    error_state: String,
    separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_state: "error".to_string(),
            separator: ",".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id (and name) of the sink state every undefined move is routed to.
    pub fn with_error_state(mut self, id: impl Into<String>) -> Self {
        self.error_state = id.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn error_state(&self) -> &str {
        &self.error_state
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

// canonical identity of a DFA state: member indices in ascending order, which is also
// ascending id order (see StateGraph)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Subset(Vec<StateIdx>);

impl Subset {
    fn from_bits(bits: &BitSet) -> Subset {
        Subset(bits.iter().map(StateIdx::from_usize).collect())
    }

    fn name(&self, graph: &StateGraph, separator: &str) -> String {
        self.0
            .iter()
            .map(|&idx| graph.id(idx))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

pub fn convert_to_dfa(nfa: &Automaton) -> Automaton {
    convert_to_dfa_with(nfa, &Config::default())
}

/// Builds a total DFA equivalent to `nfa` by subset construction. Composite ids are the
/// sorted member ids joined with the configured separator; moves that reach no NFA state
/// go to the sink state.
pub fn convert_to_dfa_with(nfa: &Automaton, config: &Config) -> Automaton {
    let alphabet: Vec<Label> = nfa
        .alphabet
        .iter()
        .filter(|label| !label.is_epsilon())
        .cloned()
        .collect();

    let error_id = config.error_state.as_str();
    let error_state = State::new(error_id);
    let error_loops: Vec<Transition> = alphabet
        .iter()
        .map(|label| Transition::new(error_id, label.clone(), error_id))
        .collect();

    let graph = StateGraph::new(nfa);
    let Some(initial) = graph.initial else {
        debug!("no initial state, emitting the sink state alone");
        return Automaton::new(vec![error_state], alphabet, error_loops);
    };

    let closures = Closures::compute(&graph);
    let columns: Vec<(&Label, Option<SymbolIdx>)> = alphabet
        .iter()
        .map(|label| (label, label.as_symbol().and_then(|s| graph.symbol(s))))
        .collect();

    let mut states: Vec<State> = Vec::new();
    let mut transitions: Vec<Transition> = error_loops;
    let mut names: HashMap<Subset, String> = HashMap::new();
    let mut pending: VecDeque<(String, BitSet)> = VecDeque::new();

    let start = closures.get(initial).clone();
    let start_key = Subset::from_bits(&start);
    let start_name = start_key.name(&graph, &config.separator);
    states.push(State {
        is_initial: true,
        is_final: graph.contains_final(&start),
        ..State::new(start_name.clone())
    });
    states.push(error_state);
    names.insert(start_key, start_name.clone());
    pending.push_back((start_name, start));

    while let Some((from, current)) = pending.pop_front() {
        for &(label, sym) in &columns {
            let next = match sym {
                Some(sym) => closures.step(&graph, &current, sym),
                None => BitSet::new(),
            };

            if next.is_empty() {
                transitions.push(Transition::new(from.as_str(), label.clone(), error_id));
                continue;
            }

            let key = Subset::from_bits(&next);
            let to = match names.get(&key) {
                Some(name) => name.clone(),
                None => {
                    let name = key.name(&graph, &config.separator);
                    trace!("discovered {{{}}} from {{{}}} on {}", name, from, label);
                    states.push(State {
                        is_final: graph.contains_final(&next),
                        ..State::new(name.clone())
                    });
                    names.insert(key, name.clone());
                    pending.push_back((name.clone(), next));
                    name
                }
            };
            transitions.push(Transition::new(from.as_str(), label.clone(), to));
        }
    }

    debug!(
        "subset construction: {} nfa states -> {} dfa states, {} transitions",
        nfa.states.len(),
        states.len(),
        transitions.len()
    );

    Automaton::new(states, alphabet, transitions)
}

impl Automaton {
    pub fn to_dfa(&self) -> Automaton {
        convert_to_dfa(self)
    }
}

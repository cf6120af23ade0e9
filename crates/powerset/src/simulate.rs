use crate::closure::Closures;
use crate::graph::StateGraph;
use crate::model::Automaton;

impl Automaton {
    /// Runs the automaton over `word`, one alphabet symbol per element, following epsilon
    /// transitions between symbols. Works the same for NFAs and DFAs.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let graph = StateGraph::new(self);
        let Some(initial) = graph.initial else {
            return false;
        };
        let closures = Closures::compute(&graph);

        let mut current = closures.get(initial).clone();
        for symbol in word {
            let Some(sym) = graph.symbol(symbol.as_ref()) else {
                return false;
            };
            current = closures.step(&graph, &current, sym);
            if current.is_empty() {
                return false;
            }
        }

        graph.contains_final(&current)
    }
}

use std::collections::BTreeSet;

use bit_set::BitSet;

use crate::graph::{StateGraph, StateIdx, SymbolIdx};
use crate::model::Automaton;

/// Every state reachable from `state_id` through zero or more epsilon transitions,
/// `state_id` included. Ids that no state declares are followed like any other.
pub fn epsilon_closure<'a>(state_id: &'a str, automaton: &'a Automaton) -> BTreeSet<&'a str> {
    let graph = StateGraph::new(automaton);
    let mut closure = BTreeSet::from([state_id]);
    let Some(start) = graph.state(state_id) else {
        return closure;
    };

    // every other member was entered through some epsilon edge, so its id can be borrowed
    // from that edge's destination
    let reached = closure_of(&graph, start);
    closure.extend(
        automaton
            .transitions
            .iter()
            .filter(|t| t.symbol.is_epsilon())
            .map(|t| t.to.as_str())
            .filter(|to| graph.state(to).is_some_and(|idx| reached.contains(idx.index()))),
    );
    closure
}

// depth first with an explicit stack; membership is tested before pushing, so epsilon
// cycles terminate
pub(crate) fn closure_of(graph: &StateGraph, start: StateIdx) -> BitSet {
    let mut closure = BitSet::with_capacity(graph.len());
    closure.insert(start.index());
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        for &next in &graph.nodes[current].epsilon {
            if closure.insert(next.index()) {
                stack.push(next);
            }
        }
    }

    closure
}

// ids that only appear as transition endpoints close to themselves alone
#[derive(Debug)]
pub(crate) struct Closures {
    table: Vec<BitSet>,
}

impl Closures {
    pub(crate) fn compute(graph: &StateGraph) -> Closures {
        let table = (0..graph.len())
            .map(StateIdx::from_usize)
            .map(|idx| {
                if graph.nodes[idx].declared {
                    closure_of(graph, idx)
                } else {
                    let mut only = BitSet::with_capacity(graph.len());
                    only.insert(idx.index());
                    only
                }
            })
            .collect();

        Closures { table }
    }

    pub(crate) fn get(&self, idx: StateIdx) -> &BitSet {
        &self.table[idx.index()]
    }

    // states reachable from `from` by one `sym` move, each destination widened by its closure
    pub(crate) fn step(&self, graph: &StateGraph, from: &BitSet, sym: SymbolIdx) -> BitSet {
        let mut next = BitSet::with_capacity(graph.len());
        for i in from.iter() {
            for &target in graph.targets(StateIdx::from_usize(i), sym) {
                next.union_with(self.get(target));
            }
        }
        next
    }
}

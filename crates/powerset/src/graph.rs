use std::collections::{BTreeSet, HashMap};

use bit_set::BitSet;
use powerset_util::make_type_idx;

use crate::model::{Automaton, Label};

make_type_idx!(StateIdx, StateNode);
make_type_idx!(SymbolIdx, String);

// state indices double as bit positions in the working sets
impl StateIdx {
    pub(crate) fn from_usize(idx: usize) -> StateIdx {
        StateIdx(idx as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) struct StateNode {
    pub(crate) id: String,
    // false for ids that only show up as transition endpoints
    pub(crate) declared: bool,
    pub(crate) is_final: bool,
    pub(crate) epsilon: Vec<StateIdx>,
    pub(crate) moves: HashMap<SymbolIdx, Vec<StateIdx>>,
}

// every id mentioned anywhere gets an index, handed out in sorted id order
#[derive(Debug)]
pub(crate) struct StateGraph {
    pub(crate) nodes: Vec<StateNode>,
    symbol_lookup: HashMap<String, SymbolIdx>,
    id_lookup: HashMap<String, StateIdx>,
    pub(crate) initial: Option<StateIdx>,
}

impl StateGraph {
    pub(crate) fn new(automaton: &Automaton) -> StateGraph {
        let mut ids: BTreeSet<&str> = automaton.states.iter().map(|s| s.id.as_str()).collect();
        for t in &automaton.transitions {
            ids.insert(t.from.as_str());
            ids.insert(t.to.as_str());
        }

        let mut nodes: Vec<StateNode> = Vec::with_capacity(ids.len());
        let mut id_lookup: HashMap<String, StateIdx> = HashMap::with_capacity(ids.len());
        for id in ids {
            let node = StateNode {
                id: id.to_string(),
                declared: false,
                is_final: false,
                epsilon: Vec::new(),
                moves: HashMap::new(),
            };
            id_lookup.insert(id.to_string(), StateIdx::from_push(&mut nodes, node));
        }

        let mut initial = None;
        for state in &automaton.states {
            let idx = id_lookup[state.id.as_str()];
            let node = &mut nodes[idx];
            node.declared = true;
            // duplicate declarations: any copy flagged final makes the id final
            node.is_final |= state.is_final;
            if state.is_initial && initial.is_none() {
                initial = Some(idx);
            }
        }

        let mut symbols: Vec<String> = Vec::new();
        let mut symbol_lookup: HashMap<String, SymbolIdx> = HashMap::new();
        for t in &automaton.transitions {
            let from = id_lookup[t.from.as_str()];
            let to = id_lookup[t.to.as_str()];
            match &t.symbol {
                Label::Epsilon => nodes[from].epsilon.push(to),
                Label::Symbol(s) => {
                    let sym = match symbol_lookup.get(s) {
                        Some(sym) => *sym,
                        None => {
                            let sym = SymbolIdx::from_push(&mut symbols, s.clone());
                            symbol_lookup.insert(s.clone(), sym);
                            sym
                        }
                    };
                    nodes[from].moves.entry(sym).or_default().push(to);
                }
            }
        }

        StateGraph {
            nodes,
            symbol_lookup,
            id_lookup,
            initial,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn state(&self, id: &str) -> Option<StateIdx> {
        self.id_lookup.get(id).copied()
    }

    pub(crate) fn symbol(&self, s: &str) -> Option<SymbolIdx> {
        self.symbol_lookup.get(s).copied()
    }

    pub(crate) fn id(&self, idx: StateIdx) -> &str {
        &self.nodes[idx].id
    }

    pub(crate) fn targets(&self, idx: StateIdx, sym: SymbolIdx) -> &[StateIdx] {
        self.nodes[idx]
            .moves
            .get(&sym)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn contains_final(&self, set: &BitSet) -> bool {
        set.iter()
            .any(|i| self.nodes[StateIdx::from_usize(i)].is_final)
    }
}

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

// glyph written out for epsilon; the empty string is accepted as an alias on input
pub const EPSILON: &str = "ε";

// epsilon is a sentinel, never a regular alphabet member
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Label {
    Epsilon,
    Symbol(String),
}

impl Label {
    pub fn symbol(s: impl Into<String>) -> Label {
        Label::from(s.into())
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Label::Epsilon => None,
            Label::Symbol(s) => Some(s),
        }
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        if s.is_empty() || s == EPSILON {
            Label::Epsilon
        } else {
            Label::Symbol(s)
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::from(s.to_string())
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        match label {
            Label::Epsilon => EPSILON.to_string(),
            Label::Symbol(s) => s,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => f.write_str(EPSILON),
            Label::Symbol(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: String,
    pub name: String,
    #[serde(rename = "isInitial", default)]
    pub is_initial: bool,
    #[serde(rename = "isFinal", default)]
    pub is_final: bool,
}

impl State {
    pub fn new(id: impl Into<String>) -> State {
        let id = id.into();
        State {
            name: id.clone(),
            id,
            is_initial: false,
            is_final: false,
        }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> State {
        State {
            name: name.into(),
            ..State::new(id)
        }
    }

    pub fn initial(mut self) -> State {
        self.is_initial = true;
        self
    }

    pub fn accepting(mut self) -> State {
        self.is_final = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub symbol: Label,
}

impl Transition {
    pub fn new(from: impl Into<String>, symbol: impl Into<Label>, to: impl Into<String>) -> Transition {
        Transition {
            from: from.into(),
            to: to.into(),
            symbol: symbol.into(),
        }
    }

    pub fn epsilon(from: impl Into<String>, to: impl Into<String>) -> Transition {
        Transition::new(from, Label::Epsilon, to)
    }
}

/// A finite automaton as handed over by the editing surface.
///
/// Nothing here enforces that transition endpoints name declared states; see
/// [`Automaton::validate`] for the opt-in check. The algorithms treat unresolved ids as
/// states that are never final; their own outgoing transitions are still followed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automaton {
    pub states: Vec<State>,
    pub alphabet: Vec<Label>,
    pub transitions: Vec<Transition>,
}

impl Automaton {
    pub fn new(states: Vec<State>, alphabet: Vec<Label>, transitions: Vec<Transition>) -> Automaton {
        Automaton {
            states,
            alphabet,
            transitions,
        }
    }

    // comma separated, entries trimmed, blanks dropped
    pub fn parse_alphabet(text: &str) -> Vec<Label> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Label::from)
            .collect()
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    // duplicates and order kept
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.alphabet.iter().filter_map(Label::as_symbol)
    }

    pub fn final_ids(&self) -> BTreeSet<&str> {
        self.states
            .iter()
            .filter(|s| s.is_final)
            .map(|s| s.id.as_str())
            .collect()
    }

    pub fn transitions_from<'a>(&'a self, id: &'a str, label: &'a Label) -> impl Iterator<Item = &'a str> + 'a {
        self.transitions
            .iter()
            .filter(move |t| t.from == id && &t.symbol == label)
            .map(|t| t.to.as_str())
    }
}

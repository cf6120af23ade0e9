mod classify;
mod closure;
mod graph;
mod model;
mod publish;
mod simulate;
mod subset;
mod validate;
mod workbench;


pub use classify::is_non_deterministic;
pub use closure::epsilon_closure;
pub use model::{Automaton, Label, State, Transition, EPSILON};
pub use publish::{Latest, SubscriptionId};
pub use subset::{convert_to_dfa, convert_to_dfa_with, Config};
pub use validate::ModelError;
pub use workbench::{SubmitError, Workbench};

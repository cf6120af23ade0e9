use std::cell::RefCell;
use std::rc::Rc;

use powerset::{Automaton, Config, State, SubmitError, Transition, Workbench};

fn parse(json: &str) -> Automaton {
    serde_json::from_str(json).expect("failed to parse automaton")
}

fn run_vectors(tests: &[(&str, bool)], nfa: &Automaton, dfa: &Automaton) {
    for (test, expected_result) in tests {
        let word: Vec<String> = test.chars().map(String::from).collect();
        let nfa_result = nfa.accepts(&word);
        let dfa_result = dfa.accepts(&word);
        assert_eq!(
            nfa_result, *expected_result,
            "nfa failed on input '{}', expect match: {}, actual match: {}",
            test, expected_result, nfa_result
        );
        assert_eq!(
            dfa_result, *expected_result,
            "dfa failed on input '{}', expect match: {}, actual match: {}",
            test, expected_result, dfa_result
        );
    }
}

// (a|b)*abb, the textbook subset construction example
fn ends_with_abb() -> Automaton {
    parse(
        r#"{
            "states": [
                { "id": "0", "name": "0", "isInitial": true },
                { "id": "1", "name": "1" }, { "id": "2", "name": "2" },
                { "id": "3", "name": "3" }, { "id": "4", "name": "4" },
                { "id": "5", "name": "5" }, { "id": "6", "name": "6" },
                { "id": "7", "name": "7" }, { "id": "8", "name": "8" },
                { "id": "9", "name": "9" },
                { "id": "10", "name": "10", "isFinal": true }
            ],
            "alphabet": ["a", "b"],
            "transitions": [
                { "from": "0", "to": "1", "symbol": "ε" },
                { "from": "0", "to": "7", "symbol": "ε" },
                { "from": "1", "to": "2", "symbol": "ε" },
                { "from": "1", "to": "4", "symbol": "ε" },
                { "from": "2", "to": "3", "symbol": "a" },
                { "from": "4", "to": "5", "symbol": "b" },
                { "from": "3", "to": "6", "symbol": "ε" },
                { "from": "5", "to": "6", "symbol": "ε" },
                { "from": "6", "to": "1", "symbol": "ε" },
                { "from": "6", "to": "7", "symbol": "ε" },
                { "from": "7", "to": "8", "symbol": "a" },
                { "from": "8", "to": "9", "symbol": "b" },
                { "from": "9", "to": "10", "symbol": "b" }
            ]
        }"#,
    )
}

#[test]
fn thompson_nfa_for_ends_with_abb() {
    let nfa = ends_with_abb();
    assert!(nfa.is_non_deterministic());

    let dfa = nfa.to_dfa();
    // ids sort as strings, so "10" lands before "2"
    let mut ids: Vec<&str> = dfa.states.iter().map(|s| s.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(
        ids,
        vec![
            "0,1,2,4,7",
            "1,10,2,4,5,6,7",
            "1,2,3,4,6,7,8",
            "1,2,4,5,6,7",
            "1,2,4,5,6,7,9",
            "error",
        ]
    );
    assert_eq!(
        dfa.states.iter().filter(|s| s.is_final).map(|s| s.id.as_str()).collect::<Vec<_>>(),
        vec!["1,10,2,4,5,6,7"]
    );
    // every move is defined, so the sink is only reachable from itself
    assert!(dfa.transitions.iter().all(|t| t.to != "error" || t.from == "error"));

    let test_vectors = [
        ("abb", true),
        ("aabb", true),
        ("babb", true),
        ("ababb", true),
        ("", false),
        ("ab", false),
        ("abba", false),
        ("bbbb", false),
    ];
    run_vectors(&test_vectors, &nfa, &dfa);
}

#[test]
fn missing_symbols_fall_into_the_sink() {
    // a+b over {a, b, c}
    let nfa = Automaton::new(
        vec![State::new("p").initial(), State::new("q"), State::new("r").accepting()],
        Automaton::parse_alphabet("a, b, c"),
        vec![
            Transition::new("p", "a", "q"),
            Transition::new("q", "a", "q"),
            Transition::new("q", "a", "p"),
            Transition::new("q", "b", "r"),
        ],
    );
    let dfa = nfa.to_dfa();

    let ids: Vec<&str> = dfa.states.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["p", "error", "q", "p,q", "r"]);
    assert!(dfa.transitions.contains(&Transition::new("p,q", "b", "r")));
    assert!(dfa.transitions.contains(&Transition::new("r", "c", "error")));

    let test_vectors = [
        ("ab", true),
        ("aaab", true),
        ("b", false),
        ("abc", false),
        ("ac", false),
        ("aba", false),
    ];
    run_vectors(&test_vectors, &nfa, &dfa);
}

fn recorder() -> (Rc<RefCell<Vec<Rc<Automaton>>>>, impl FnMut(&Rc<Automaton>) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |automaton: &Rc<Automaton>| sink.borrow_mut().push(Rc::clone(automaton)))
}

#[test]
fn workbench_rejects_deterministic_submissions() {
    let mut workbench = Workbench::new();
    let (seen, subscriber) = recorder();
    workbench.subscribe_nfa(subscriber);

    let deterministic = Automaton::new(
        vec![State::new("q0").initial(), State::new("q1").accepting()],
        Automaton::parse_alphabet("a"),
        vec![Transition::new("q0", "a", "q1")],
    );
    assert_eq!(workbench.submit(deterministic), Err(SubmitError::Deterministic));
    assert!(workbench.latest_nfa().is_none());
    assert!(seen.borrow().is_empty());

    let nfa = ends_with_abb();
    let published = workbench.submit(nfa.clone()).expect("nfa should be accepted");
    assert_eq!(*published, nfa);
    assert_eq!(workbench.latest_nfa().as_deref(), Some(&nfa));
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn workbench_publishes_each_conversion() {
    let mut workbench = Workbench::with_config(Config::new().with_error_state("dead"));
    assert_eq!(workbench.config().error_state(), "dead");

    let nfa = ends_with_abb();
    let first = workbench.convert(&nfa);
    assert!(first.state("dead").is_some());

    // late subscribers see the latest result right away
    let (seen, subscriber) = recorder();
    let id = workbench.subscribe_dfa(subscriber);
    assert_eq!(seen.borrow().len(), 1);
    assert!(Rc::ptr_eq(&seen.borrow()[0], &first));

    let other = Automaton::new(
        vec![State::new("s").initial().accepting()],
        Automaton::parse_alphabet("x"),
        vec![Transition::epsilon("s", "s")],
    );
    let second = workbench.convert(&other);
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(workbench.latest_dfa().as_deref(), Some(&*second));

    assert!(workbench.unsubscribe_dfa(id));
    workbench.convert(&nfa);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn workbench_converts_without_rechecking_and_tolerates_dangling_ids() {
    let mut workbench = Workbench::new();
    workbench.set_automaton(Automaton::default());

    let dangling = Automaton::new(
        vec![State::new("q0").initial()],
        Automaton::parse_alphabet("a"),
        vec![Transition::new("q0", "a", "nowhere")],
    );
    assert!(dangling.validate().is_err());

    let dfa = workbench.convert(&dangling);
    let ids: Vec<&str> = dfa.states.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["q0", "error", "nowhere"]);
    assert_eq!(workbench.latest_nfa().as_deref(), Some(&Automaton::default()));
}

#[test]
fn workbench_separator_keeps_composite_ids_apart_from_member_ids() {
    let nfa = Automaton::new(
        vec![
            State::new("s").initial(),
            State::new("x,y"),
            State::new("x").accepting(),
            State::new("y"),
        ],
        Automaton::parse_alphabet("a,b"),
        vec![
            Transition::new("s", "a", "x,y"),
            Transition::new("s", "b", "x"),
            Transition::new("s", "b", "y"),
            Transition::new("x,y", "a", "s"),
        ],
    );

    // the default separator is flagged but conversion still publishes
    let mut workbench = Workbench::new();
    assert_eq!(nfa.conflicting_ids(workbench.config()), vec!["x,y"]);
    let dfa = workbench.convert(&nfa);
    assert_eq!(dfa.states.iter().filter(|s| s.id == "x,y").count(), 2);

    let config = Config::new().with_separator("|");
    assert_eq!(nfa.validate_with(&config), Ok(()));
    let mut workbench = Workbench::with_config(config);
    let dfa = workbench.convert(&nfa);
    let ids: Vec<&str> = dfa.states.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s", "error", "x,y", "x|y"]);
    assert!(dfa.state("x|y").is_some_and(|s| s.is_final));
    assert!(!dfa.state("x,y").is_some_and(|s| s.is_final));
}

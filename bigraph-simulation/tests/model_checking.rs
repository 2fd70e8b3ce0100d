//! End-to-end exploration of the Room/Computer/Job system.

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use bigraph_core::{Bigraph, BigraphBuilder, Control, LinkId, Signature};
use bigraph_simulation::{
    canonical, CheckerStatus, Listeners, ModelChecker, ModelCheckingOptions, ReactionRule,
    ReactiveSystem, SimulationStrategy, SubBigraphMatchPredicate,
};
use simplelog::{Config, LevelFilter, SimpleLogger};

static LOGGER: Once = Once::new();

fn init_logging() {
    LOGGER.call_once(|| {
        let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());
    });
}

fn sig() -> Signature {
    Signature::from_controls(vec![
        Control::active("Room", 0),
        Control::active("Computer", 1),
        Control::atomic("Job", 0),
    ])
    .unwrap()
}

/// Root -> Room -> { Computer(network), `jobs` Jobs }
fn agent(jobs: usize) -> Bigraph {
    let mut builder = BigraphBuilder::new(sig());
    let root = builder.add_root();
    let room = builder.add_node("Room", root.into()).unwrap();
    let net = builder.add_outer_name("network").unwrap();
    let computer = builder.add_node("Computer", room.into()).unwrap();
    builder
        .connect_port(computer, 0, LinkId::Outer(net))
        .unwrap();
    for _ in 0..jobs {
        builder.add_node("Job", room.into()).unwrap();
    }
    builder.finish().unwrap()
}

/// Room(Computer(network), site) -> Room(Computer(network), Job, site)
fn add_job_rule(name: &str) -> ReactionRule {
    let mut builder = BigraphBuilder::new(sig());
    let root = builder.add_root();
    let room = builder.add_node("Room", root.into()).unwrap();
    let net = builder.add_outer_name("network").unwrap();
    let computer = builder.add_node("Computer", room.into()).unwrap();
    builder
        .connect_port(computer, 0, LinkId::Outer(net))
        .unwrap();
    builder.add_site(room.into()).unwrap();
    let redex = builder.finish().unwrap();

    let mut builder = BigraphBuilder::new(sig());
    let root = builder.add_root();
    let room = builder.add_node("Room", root.into()).unwrap();
    let net = builder.add_outer_name("network").unwrap();
    let computer = builder.add_node("Computer", room.into()).unwrap();
    builder
        .connect_port(computer, 0, LinkId::Outer(net))
        .unwrap();
    builder.add_node("Job", room.into()).unwrap();
    builder.add_site(room.into()).unwrap();
    let reactum = builder.finish().unwrap();

    ReactionRule::new(name, redex, reactum).unwrap()
}

/// Pattern: a Room holding at least two Jobs.
fn two_jobs_predicate() -> SubBigraphMatchPredicate {
    let mut builder = BigraphBuilder::new(sig());
    let root = builder.add_root();
    let room = builder.add_node("Room", root.into()).unwrap();
    builder.add_node("Job", room.into()).unwrap();
    builder.add_node("Job", room.into()).unwrap();
    builder.add_site(room.into()).unwrap();
    SubBigraphMatchPredicate::new("two-jobs", builder.finish().unwrap())
}

#[test]
fn breadth_first_exploration_grows_jobs_up_to_the_budget() {
    init_logging();
    let mut system = ReactiveSystem::new(agent(0));
    system.add_rule(add_job_rule("addJob")).unwrap();
    system.add_predicate(Box::new(two_jobs_predicate()));

    let matched: Arc<Mutex<Vec<(String, String, Vec<String>)>>> =
        Arc::new(Mutex::new(Vec::new()));
    let matched_sink = Arc::clone(&matched);
    let listeners = Listeners::new().on_predicate_matched(move |state, predicate, path| {
        matched_sink
            .lock()
            .unwrap()
            .push((state.to_owned(), predicate.to_owned(), path.to_vec()));
    });

    let mut checker = ModelChecker::new(
        system,
        SimulationStrategy::BreadthFirst,
        ModelCheckingOptions::new().maximum_transitions(4),
    )
    .with_listeners(listeners);
    let result = checker.execute().unwrap();

    assert_eq!(result.status, CheckerStatus::Finished);
    assert!(result.transition_budget_exhausted);
    assert!(!result.time_budget_exhausted);
    assert!(result.stats.transitions <= 4);
    assert_eq!(result.stats.states, 5);

    // The states are exactly the agents with 0..=4 Jobs.
    let graph = checker.reaction_graph();
    let mut forms: Vec<String> = graph
        .state_indices()
        .map(|index| graph.canonical_of(index).to_owned())
        .collect();
    forms.sort();
    let mut expected: Vec<String> = (0..=4).map(|jobs| canonical(&agent(jobs))).collect();
    expected.sort();
    assert_eq!(forms, expected);

    // The two-Jobs predicate was reported with a non-empty witness
    // path starting at the initial state.
    let matched = matched.lock().unwrap();
    let witness = matched
        .iter()
        .find(|(_, predicate, _)| predicate == "two-jobs")
        .expect("predicate must match within the budget");
    assert!(!witness.2.is_empty());
    assert_eq!(witness.2.first().map(String::as_str), Some("a:0"));
    assert_eq!(witness.2.len(), 3);
}

#[test]
fn equal_states_collapse_into_one_vertex() {
    init_logging();
    // Two distinct rules with the same effect: every successor pair is
    // isomorphic, so each exploration step adds one state but two
    // parallel transitions.
    let mut system = ReactiveSystem::new(agent(0));
    system.add_rule(add_job_rule("viaA")).unwrap();
    system.add_rule(add_job_rule("viaB")).unwrap();

    let mut checker = ModelChecker::new(
        system,
        SimulationStrategy::BreadthFirst,
        ModelCheckingOptions::new().maximum_transitions(6),
    );
    let result = checker.execute().unwrap();

    assert!(result.transition_budget_exhausted);
    assert_eq!(result.stats.transitions, 6);
    // 0..=3 Jobs discovered, each rediscovery merged by canonical form.
    assert_eq!(result.stats.states, 4);
    assert_eq!(result.stats.occurrences, 6);
}

#[test]
fn exhausted_exploration_finishes_without_budget_flags() {
    init_logging();
    // No rule matches the empty Room system; exploration terminates on
    // its own.
    let mut builder = BigraphBuilder::new(sig());
    let root = builder.add_root();
    builder.add_node("Room", root.into()).unwrap();
    let lonely_agent = builder.finish().unwrap();

    let nulls: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let nulls_sink = Arc::clone(&nulls);
    let listeners = Listeners::new().on_reaction_is_null(move |rule| {
        nulls_sink.lock().unwrap().push(rule.to_owned());
    });

    let mut system = ReactiveSystem::new(lonely_agent);
    system.add_rule(add_job_rule("addJob")).unwrap();
    let mut checker = ModelChecker::new(
        system,
        SimulationStrategy::BreadthFirst,
        ModelCheckingOptions::new(),
    )
    .with_listeners(listeners);
    let result = checker.execute().unwrap();

    assert_eq!(result.status, CheckerStatus::Finished);
    assert!(!result.transition_budget_exhausted);
    assert!(!result.time_budget_exhausted);
    assert_eq!(result.stats.states, 1);
    assert_eq!(result.stats.transitions, 0);
    assert_eq!(nulls.lock().unwrap().as_slice(), ["addJob".to_owned()]);
}

#[test]
fn random_walk_is_reproducible_under_a_seed() {
    init_logging();
    let run = |seed: u64| -> Vec<String> {
        let mut system = ReactiveSystem::new(agent(0));
        system.add_rule(add_job_rule("addJob")).unwrap();
        let mut checker = ModelChecker::new(
            system,
            SimulationStrategy::RandomWalk,
            ModelCheckingOptions::new()
                .maximum_transitions(3)
                .random_seed(seed),
        );
        checker.execute().unwrap();
        checker
            .reaction_graph()
            .state_indices()
            .map(|index| checker.reaction_graph().canonical_of(index).to_owned())
            .collect()
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn time_budget_reports_exhaustion() {
    init_logging();
    let mut system = ReactiveSystem::new(agent(0));
    system.add_rule(add_job_rule("addJob")).unwrap();
    let mut checker = ModelChecker::new(
        system,
        SimulationStrategy::BreadthFirst,
        ModelCheckingOptions::new().maximum_time(Duration::from_secs(0)),
    );
    let result = checker.execute().unwrap();
    assert_eq!(result.status, CheckerStatus::Finished);
    assert!(result.time_budget_exhausted);
}

#[test]
fn trace_file_contains_the_reaction_graph() {
    init_logging();
    let dir = std::env::temp_dir().join("bigraph-simulation-trace-test");
    std::fs::create_dir_all(&dir).unwrap();
    let trace = dir.join("trace.dot");

    let mut system = ReactiveSystem::new(agent(0));
    system.add_rule(add_job_rule("addJob")).unwrap();
    let mut checker = ModelChecker::new(
        system,
        SimulationStrategy::BreadthFirst,
        ModelCheckingOptions::new()
            .maximum_transitions(2)
            .output_states_folder(&dir)
            .trace_file(&trace),
    );
    checker.execute().unwrap();

    let dot = std::fs::read_to_string(&trace).unwrap();
    assert!(dot.contains("digraph"));
    assert!(dot.contains("addJob"));
    assert!(dir.join("state-0.bfcs").exists());
}

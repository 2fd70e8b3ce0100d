//! Model checking over bigraphical reactive systems: state-space
//! exploration, predicate evaluation and reaction-graph construction.

mod bfs;
mod random;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, warn};
use petgraph::graph::NodeIndex;
use thiserror::Error;

use bigraph_core::{Bigraph, CompositionError};

use crate::encoding::canonical;
use crate::matching::MatchingError;
use crate::predicates::ReactiveSystemPredicate;
use crate::reaction::{ReactionError, ReactionRule};
use crate::reaction_graph::{ReactionGraph, ReactionGraphStats};

/// Errors raised by checker configuration, exploration or export.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The initial agent has sites or inner names.
    #[error("the agent of a reactive system must be ground")]
    AgentNotGround,
    /// A rule was added whose signature differs from the system's.
    #[error("rule '{0}' carries a different signature than the system")]
    RuleSignatureMismatch(String),
    /// A rule failed its own validation.
    #[error(transparent)]
    Rule(#[from] ReactionError),
    /// The matcher rejected an agent/redex pair mid-run.
    #[error(transparent)]
    Matching(#[from] MatchingError),
    /// Building a reaction result failed for one occurrence.
    #[error(transparent)]
    Reaction(#[from] CompositionError),
    /// Writing a state or trace artifact failed.
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
    /// No path between two states that should be connected.
    #[error("no path between states for witness extraction")]
    PathNotFound,
}

/// A reactive system: one ground agent, ordered reaction rules and
/// ordered predicates.
pub struct ReactiveSystem {
    agent: Bigraph,
    rules: Vec<ReactionRule>,
    predicates: Vec<Box<dyn ReactiveSystemPredicate>>,
}

impl ReactiveSystem {
    /// Creates a system over the given initial agent.
    pub fn new(agent: Bigraph) -> Self {
        Self {
            agent,
            rules: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Adds a reaction rule; rules are applied in registration order.
    pub fn add_rule(&mut self, rule: ReactionRule) -> Result<&mut Self, SimulationError> {
        if rule.redex().signature() != self.agent.signature() {
            return Err(SimulationError::RuleSignatureMismatch(
                rule.name().to_owned(),
            ));
        }
        self.rules.push(rule);
        Ok(self)
    }

    /// Adds a predicate checked on every explored state.
    pub fn add_predicate(&mut self, predicate: Box<dyn ReactiveSystemPredicate>) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    /// The initial agent.
    pub fn agent(&self) -> &Bigraph {
        &self.agent
    }

    /// The registered rules in order.
    pub fn rules(&self) -> &[ReactionRule] {
        &self.rules
    }

    /// The registered predicates in order.
    pub fn predicates(&self) -> &[Box<dyn ReactiveSystemPredicate>] {
        &self.predicates
    }
}

/// Exploration strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStrategy {
    /// Deterministic FIFO exploration of the whole reachable space.
    BreadthFirst,
    /// Single random trajectory, one uniformly chosen successor per
    /// step; all discovered transitions are still recorded.
    RandomWalk,
}

/// Checker configuration, builder style.
pub struct ModelCheckingOptions {
    maximum_transitions: usize,
    maximum_time: Duration,
    measure_time: bool,
    allow_reducible_classes: bool,
    output_states_folder: Option<PathBuf>,
    trace_file: Option<PathBuf>,
    random_seed: Option<u64>,
}

impl Default for ModelCheckingOptions {
    fn default() -> Self {
        Self {
            maximum_transitions: usize::MAX,
            maximum_time: Duration::from_secs(30),
            measure_time: false,
            allow_reducible_classes: false,
            output_states_folder: None,
            trace_file: None,
            random_seed: None,
        }
    }
}

impl ModelCheckingOptions {
    /// Default options: unbounded transitions, 30 second time budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of transitions added to the reaction graph.
    pub fn maximum_transitions(mut self, maximum: usize) -> Self {
        self.maximum_transitions = maximum;
        self
    }

    /// Caps the wall-clock exploration time.
    pub fn maximum_time(mut self, maximum: Duration) -> Self {
        self.maximum_time = maximum;
        self
    }

    /// Logs matching and reaction-building durations.
    pub fn measure_time(mut self, enabled: bool) -> Self {
        self.measure_time = enabled;
        self
    }

    /// Allows already-known states to be re-enqueued and re-explored
    /// when rediscovered; vertices are still deduplicated.
    pub fn allow_reducible_classes(mut self, enabled: bool) -> Self {
        self.allow_reducible_classes = enabled;
        self
    }

    /// Writes the canonical form of each newly discovered state into
    /// the given folder.
    pub fn output_states_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.output_states_folder = Some(folder.into());
        self
    }

    /// Writes the final reaction graph as Graphviz DOT text.
    pub fn trace_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.trace_file = Some(file.into());
        self
    }

    /// Fixes the random-walk seed for reproducible runs.
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }
}

type StateCallback = Box<dyn Fn(&str) + Send + Sync>;
type PredicateCallback = Box<dyn Fn(&str, &str, &[String]) + Send + Sync>;

/// Optional callbacks into the exploration loop; every hook defaults
/// to a no-op.
#[derive(Default)]
pub struct Listeners {
    on_started: Option<Box<dyn Fn() + Send + Sync>>,
    on_finished: Option<Box<dyn Fn() + Send + Sync>>,
    on_checking_rule: Option<StateCallback>,
    on_reaction_is_null: Option<StateCallback>,
    on_all_predicates_matched: Option<StateCallback>,
    on_predicate_matched: Option<PredicateCallback>,
    on_predicate_violated: Option<PredicateCallback>,
    on_error: Option<Box<dyn Fn(&SimulationError) + Send + Sync>>,
}

impl Listeners {
    /// No-op listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once before exploration starts.
    pub fn on_started(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_started = Some(Box::new(f));
        self
    }

    /// Called once after exploration ends, regardless of outcome.
    pub fn on_finished(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_finished = Some(Box::new(f));
        self
    }

    /// Called with a rule name before that rule is matched against a
    /// state.
    pub fn on_checking_rule(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_checking_rule = Some(Box::new(f));
        self
    }

    /// Called with a rule name when the rule produced no successor for
    /// a state.
    pub fn on_reaction_is_null(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_reaction_is_null = Some(Box::new(f));
        self
    }

    /// Called with a state label when every predicate holds there.
    pub fn on_all_predicates_matched(
        mut self,
        f: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        self.on_all_predicates_matched = Some(Box::new(f));
        self
    }

    /// Called with `(state label, predicate name, witness path)` when a
    /// predicate holds at a state.
    pub fn on_predicate_matched(
        mut self,
        f: impl Fn(&str, &str, &[String]) + Send + Sync + 'static,
    ) -> Self {
        self.on_predicate_matched = Some(Box::new(f));
        self
    }

    /// Called with `(state label, predicate name, counter-example
    /// path)` when a predicate fails at a state.
    pub fn on_predicate_violated(
        mut self,
        f: impl Fn(&str, &str, &[String]) + Send + Sync + 'static,
    ) -> Self {
        self.on_predicate_violated = Some(Box::new(f));
        self
    }

    /// Called on every reported error, fatal or skipped.
    pub fn on_error(mut self, f: impl Fn(&SimulationError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub(crate) fn fire_started(&self) {
        if let Some(f) = &self.on_started {
            f();
        }
    }

    pub(crate) fn fire_finished(&self) {
        if let Some(f) = &self.on_finished {
            f();
        }
    }

    pub(crate) fn fire_checking_rule(&self, rule: &str) {
        if let Some(f) = &self.on_checking_rule {
            f(rule);
        }
    }

    pub(crate) fn fire_reaction_is_null(&self, rule: &str) {
        if let Some(f) = &self.on_reaction_is_null {
            f(rule);
        }
    }

    pub(crate) fn fire_all_predicates_matched(&self, label: &str) {
        if let Some(f) = &self.on_all_predicates_matched {
            f(label);
        }
    }

    pub(crate) fn fire_predicate_matched(&self, label: &str, predicate: &str, path: &[String]) {
        if let Some(f) = &self.on_predicate_matched {
            f(label, predicate, path);
        }
    }

    pub(crate) fn fire_predicate_violated(&self, label: &str, predicate: &str, path: &[String]) {
        if let Some(f) = &self.on_predicate_violated {
            f(label, predicate, path);
        }
    }

    pub(crate) fn fire_error(&self, error: &SimulationError) {
        if let Some(f) = &self.on_error {
            f(error);
        }
    }
}

/// Why exploration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerStatus {
    /// Exploration ran to completion or hit a budget.
    Finished,
    /// Exploration stopped on an unrecoverable error.
    Aborted,
}

/// The outcome of one [`ModelChecker::execute`] run.
#[derive(Debug, Clone)]
pub struct ModelCheckingResult {
    /// Finished or aborted.
    pub status: CheckerStatus,
    /// True if the transition budget stopped exploration. Budget
    /// exhaustion is a successful termination, not an error.
    pub transition_budget_exhausted: bool,
    /// True if the time budget stopped exploration.
    pub time_budget_exhausted: bool,
    /// Reaction-graph counters at the end of the run.
    pub stats: ReactionGraphStats,
    /// Wall-clock duration, present when `measure_time` is set.
    pub elapsed: Option<Duration>,
}

/// Shared read-only state handed to the strategies.
pub(crate) struct ExplorationShared<'a> {
    pub(crate) system: &'a ReactiveSystem,
    pub(crate) options: &'a ModelCheckingOptions,
    pub(crate) listeners: &'a Listeners,
}

/// What a strategy reports back.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ExplorationOutcome {
    pub(crate) transition_budget_exhausted: bool,
    pub(crate) time_budget_exhausted: bool,
    pub(crate) aborted: bool,
}

/// Drives a [`ReactiveSystem`] through a [`SimulationStrategy`],
/// building a [`ReactionGraph`] and evaluating predicates.
pub struct ModelChecker {
    system: ReactiveSystem,
    strategy: SimulationStrategy,
    options: ModelCheckingOptions,
    listeners: Listeners,
    reaction_graph: ReactionGraph,
}

impl ModelChecker {
    /// Creates a checker; exploration starts with [`Self::execute`].
    pub fn new(
        system: ReactiveSystem,
        strategy: SimulationStrategy,
        options: ModelCheckingOptions,
    ) -> Self {
        Self {
            system,
            strategy,
            options,
            listeners: Listeners::new(),
            reaction_graph: ReactionGraph::new(),
        }
    }

    /// Installs listener callbacks.
    pub fn with_listeners(mut self, listeners: Listeners) -> Self {
        self.listeners = listeners;
        self
    }

    /// The reaction graph built so far.
    pub fn reaction_graph(&self) -> &ReactionGraph {
        &self.reaction_graph
    }

    /// Runs the exploration. Configuration errors are returned as
    /// `Err`; runtime errors abort the run and surface in the result's
    /// status and the `on_error` listener.
    pub fn execute(&mut self) -> Result<ModelCheckingResult, SimulationError> {
        if !self.system.agent().is_ground() {
            return Err(SimulationError::AgentNotGround);
        }
        self.listeners.fire_started();
        let started = Instant::now();

        let shared = ExplorationShared {
            system: &self.system,
            options: &self.options,
            listeners: &self.listeners,
        };
        let outcome = match self.strategy {
            SimulationStrategy::BreadthFirst => bfs::explore(&shared, &mut self.reaction_graph),
            SimulationStrategy::RandomWalk => random::explore(&shared, &mut self.reaction_graph),
        };

        if let Some(trace_file) = &self.options.trace_file {
            if let Err(error) = fs::write(trace_file, self.reaction_graph.to_dot()) {
                let error = SimulationError::Io(error);
                warn!("failed to write trace file: {}", error);
                self.listeners.fire_error(&error);
            }
        }

        let elapsed = started.elapsed();
        if self.options.measure_time {
            debug!("model checking took {:?}", elapsed);
        }
        self.listeners.fire_finished();

        Ok(ModelCheckingResult {
            status: if outcome.aborted {
                CheckerStatus::Aborted
            } else {
                CheckerStatus::Finished
            },
            transition_budget_exhausted: outcome.transition_budget_exhausted,
            time_budget_exhausted: outcome.time_budget_exhausted,
            stats: self.reaction_graph.stats(),
            elapsed: self.options.measure_time.then_some(elapsed),
        })
    }
}

/// Registers a state in the graph, writing its canonical form to the
/// states folder when configured. Export failures are reported and
/// skipped.
pub(crate) fn register_state(
    shared: &ExplorationShared<'_>,
    graph: &mut ReactionGraph,
    state: &Bigraph,
) -> (NodeIndex, bool) {
    let form = canonical(state);
    let (index, fresh) = graph.add_state(form, state);
    if fresh {
        if let Some(folder) = &shared.options.output_states_folder {
            let path = folder.join(format!("state-{}.bfcs", index.index()));
            let mut content = graph.canonical_of(index).to_owned();
            content.push('\n');
            if let Err(error) = fs::write(&path, content) {
                let error = SimulationError::Io(error);
                warn!("failed to export state {}: {}", graph.label(index), error);
                shared.listeners.fire_error(&error);
            }
        }
    }
    (index, fresh)
}

/// Evaluates every predicate on a state, firing match/violation
/// listeners with witness paths from the initial state.
pub(crate) fn evaluate_predicates(
    shared: &ExplorationShared<'_>,
    graph: &ReactionGraph,
    initial: NodeIndex,
    current: NodeIndex,
    state: &Bigraph,
) {
    if shared.system.predicates().is_empty() {
        return;
    }
    let mut all_matched = true;
    for predicate in shared.system.predicates() {
        let holds = predicate.test(state);
        let path = graph.shortest_path(initial, current);
        match (holds, path) {
            (true, Some(path)) => {
                shared
                    .listeners
                    .fire_predicate_matched(graph.label(current), predicate.name(), &path);
            }
            (false, Some(path)) => {
                all_matched = false;
                shared
                    .listeners
                    .fire_predicate_violated(graph.label(current), predicate.name(), &path);
            }
            (_, None) => {
                all_matched &= holds;
                shared.listeners.fire_error(&SimulationError::PathNotFound);
            }
        }
    }
    if all_matched {
        shared
            .listeners
            .fire_all_predicates_matched(graph.label(current));
    }
}

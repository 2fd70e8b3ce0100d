//! Breadth-first exploration: deterministic FIFO expansion of the
//! whole reachable state space.

use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, warn};
use rayon::prelude::*;

use bigraph_core::Bigraph;

use crate::encoding::canonical;
use crate::matching::{match_agent, MatchingError};
use crate::modelchecking::{
    evaluate_predicates, register_state, ExplorationOutcome, ExplorationShared, SimulationError,
};
use crate::reaction::build_reaction;
use crate::reaction_graph::ReactionGraph;

/// Successors produced by one rule on one state.
type RuleResult = Result<Vec<(usize, Bigraph)>, MatchingError>;

pub(crate) fn explore(
    shared: &ExplorationShared<'_>,
    graph: &mut ReactionGraph,
) -> ExplorationOutcome {
    let mut outcome = ExplorationOutcome::default();
    let agent = shared.system.agent().clone();
    let (initial, _) = register_state(shared, graph, &agent);

    let mut queue: VecDeque<Bigraph> = VecDeque::new();
    queue.push_back(agent);
    let mut transitions = 0usize;
    let started = Instant::now();

    'exploration: while let Some(current) = queue.pop_front() {
        if transitions >= shared.options.maximum_transitions {
            outcome.transition_budget_exhausted = true;
            break;
        }
        if started.elapsed() >= shared.options.maximum_time {
            outcome.time_budget_exhausted = true;
            break;
        }
        let current_index = graph
            .state(&canonical(&current))
            .unwrap_or_else(|| unreachable!("enqueued states are registered"));

        // Match every rule against the current state on the worker
        // pool; collect keeps registration order, and all graph
        // mutation stays on this thread.
        let matching_started = Instant::now();
        let results: Vec<RuleResult> = shared
            .system
            .rules()
            .par_iter()
            .map(|rule| {
                shared.listeners.fire_checking_rule(rule.name());
                let occurrences = match_agent(&current, rule.redex())?;
                let mut successors = Vec::with_capacity(occurrences.len());
                for (occurrence_index, occurrence) in occurrences.iter().enumerate() {
                    match build_reaction(occurrence, rule) {
                        Ok(successor) => successors.push((occurrence_index, successor)),
                        Err(error) => {
                            // Fatal for this occurrence only.
                            warn!(
                                "dropping occurrence {} of rule '{}': {}",
                                occurrence_index,
                                rule.name(),
                                error
                            );
                        }
                    }
                }
                Ok(successors)
            })
            .collect();
        if shared.options.measure_time {
            debug!(
                "matched {} rule(s) in {:?}",
                shared.system.rules().len(),
                matching_started.elapsed()
            );
        }

        for (rule, result) in shared.system.rules().iter().zip(results) {
            let successors = match result {
                Ok(successors) => successors,
                Err(error) => {
                    let error = SimulationError::Matching(error);
                    warn!("aborting exploration: {}", error);
                    shared.listeners.fire_error(&error);
                    outcome.aborted = true;
                    break 'exploration;
                }
            };
            if successors.is_empty() {
                shared.listeners.fire_reaction_is_null(rule.name());
                continue;
            }
            for (occurrence_index, successor) in successors {
                if transitions >= shared.options.maximum_transitions {
                    outcome.transition_budget_exhausted = true;
                    break 'exploration;
                }
                let (successor_index, fresh) = register_state(shared, graph, &successor);
                graph.add_transition(current_index, successor_index, rule.name(), occurrence_index);
                transitions += 1;
                if fresh || shared.options.allow_reducible_classes {
                    queue.push_back(successor);
                }
            }
        }

        evaluate_predicates(shared, graph, initial, current_index, &current);
    }

    outcome
}

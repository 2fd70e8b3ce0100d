//! Random-walk exploration: a single trajectory through the state
//! space, following one uniformly chosen successor per step. Every
//! discovered transition is still recorded in the reaction graph.

use std::time::Instant;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bigraph_core::Bigraph;

use crate::encoding::canonical;
use crate::matching::match_agent;
use crate::modelchecking::{
    evaluate_predicates, register_state, ExplorationOutcome, ExplorationShared, SimulationError,
};
use crate::reaction::build_reaction;
use crate::reaction_graph::ReactionGraph;

pub(crate) fn explore(
    shared: &ExplorationShared<'_>,
    graph: &mut ReactionGraph,
) -> ExplorationOutcome {
    let mut outcome = ExplorationOutcome::default();
    let mut rng = match shared.options.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut current = shared.system.agent().clone();
    let (initial, _) = register_state(shared, graph, &current);
    let mut transitions = 0usize;
    let started = Instant::now();

    'walk: loop {
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
            .unwrap_or_else(|| unreachable!("the walk only visits registered states"));
        evaluate_predicates(shared, graph, initial, current_index, &current);

        // Record every successor of the current state, then follow one.
        let mut successors: Vec<Bigraph> = Vec::new();
        for rule in shared.system.rules() {
            shared.listeners.fire_checking_rule(rule.name());
            let occurrences = match match_agent(&current, rule.redex()) {
                Ok(occurrences) => occurrences,
                Err(error) => {
                    let error = SimulationError::Matching(error);
                    warn!("aborting walk: {}", error);
                    shared.listeners.fire_error(&error);
                    outcome.aborted = true;
                    break 'walk;
                }
            };
            if occurrences.is_empty() {
                shared.listeners.fire_reaction_is_null(rule.name());
                continue;
            }
            for (occurrence_index, occurrence) in occurrences.iter().enumerate() {
                match build_reaction(occurrence, rule) {
                    Ok(successor) => {
                        if transitions >= shared.options.maximum_transitions {
                            outcome.transition_budget_exhausted = true;
                            break 'walk;
                        }
                        let (successor_index, _) = register_state(shared, graph, &successor);
                        graph.add_transition(
                            current_index,
                            successor_index,
                            rule.name(),
                            occurrence_index,
                        );
                        transitions += 1;
                        successors.push(successor);
                    }
                    Err(error) => {
                        warn!(
                            "dropping occurrence {} of rule '{}': {}",
                            occurrence_index,
                            rule.name(),
                            error
                        );
                    }
                }
            }
        }

        if successors.is_empty() {
            debug!("random walk reached a state without successors");
            break;
        }
        current = successors.swap_remove(rng.gen_range(0..successors.len()));
    }

    outcome
}

//! State predicates evaluated during model checking.

use log::warn;

use bigraph_core::Bigraph;

use crate::encoding::canonical;
use crate::matching::match_agent;

/// A predicate over ground agents, evaluated on every explored state.
pub trait ReactiveSystemPredicate: Send + Sync {
    /// The predicate's name, used in listener callbacks and logs.
    fn name(&self) -> &str;

    /// Tests the predicate against a state.
    fn test(&self, state: &Bigraph) -> bool;
}

/// Holds iff the state is isomorphic to a fixed target bigraph,
/// decided by canonical-form equality.
pub struct BigraphIsoPredicate {
    name: String,
    target_canonical: String,
}

impl BigraphIsoPredicate {
    /// Creates the predicate from the target bigraph.
    pub fn new(name: impl Into<String>, target: &Bigraph) -> Self {
        Self {
            name: name.into(),
            target_canonical: canonical(target),
        }
    }
}

impl ReactiveSystemPredicate for BigraphIsoPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn test(&self, state: &Bigraph) -> bool {
        canonical(state) == self.target_canonical
    }
}

/// Holds iff a fixed pattern occurs somewhere in the state, decided by
/// the matcher. Matching errors count as "does not hold" (logged).
pub struct SubBigraphMatchPredicate {
    name: String,
    pattern: Bigraph,
}

impl SubBigraphMatchPredicate {
    /// Creates the predicate from the pattern to search for.
    pub fn new(name: impl Into<String>, pattern: Bigraph) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }
}

impl ReactiveSystemPredicate for SubBigraphMatchPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn test(&self, state: &Bigraph) -> bool {
        match match_agent(state, &self.pattern) {
            Ok(occurrences) => !occurrences.is_empty(),
            Err(error) => {
                warn!("predicate '{}' failed to match: {}", self.name, error);
                false
            }
        }
    }
}

/// Conjunction of predicates.
pub struct AndPredicate {
    name: String,
    operands: Vec<Box<dyn ReactiveSystemPredicate>>,
}

impl AndPredicate {
    /// Creates the conjunction.
    pub fn new(name: impl Into<String>, operands: Vec<Box<dyn ReactiveSystemPredicate>>) -> Self {
        Self {
            name: name.into(),
            operands,
        }
    }
}

impl ReactiveSystemPredicate for AndPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn test(&self, state: &Bigraph) -> bool {
        self.operands.iter().all(|p| p.test(state))
    }
}

/// Disjunction of predicates.
pub struct OrPredicate {
    name: String,
    operands: Vec<Box<dyn ReactiveSystemPredicate>>,
}

impl OrPredicate {
    /// Creates the disjunction.
    pub fn new(name: impl Into<String>, operands: Vec<Box<dyn ReactiveSystemPredicate>>) -> Self {
        Self {
            name: name.into(),
            operands,
        }
    }
}

impl ReactiveSystemPredicate for OrPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn test(&self, state: &Bigraph) -> bool {
        self.operands.iter().any(|p| p.test(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigraph_core::{BigraphBuilder, Control, Signature};

    fn sig() -> Signature {
        Signature::from_controls(vec![
            Control::active("Room", 0),
            Control::atomic("Job", 0),
        ])
        .unwrap()
    }

    fn room_with_jobs(jobs: usize) -> Bigraph {
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let room = builder.add_node("Room", root.into()).unwrap();
        for _ in 0..jobs {
            builder.add_node("Job", room.into()).unwrap();
        }
        builder.finish().unwrap()
    }

    #[test]
    fn iso_predicate_ignores_construction_order() {
        let predicate = BigraphIsoPredicate::new("two-jobs", &room_with_jobs(2));
        assert!(predicate.test(&room_with_jobs(2)));
        assert!(!predicate.test(&room_with_jobs(1)));
    }

    #[test]
    fn sub_match_predicate_finds_nested_patterns() {
        // Pattern: a Room containing a Job (and anything else).
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let room = builder.add_node("Room", root.into()).unwrap();
        builder.add_node("Job", room.into()).unwrap();
        builder.add_site(room.into()).unwrap();
        let pattern = builder.finish().unwrap();

        let predicate = SubBigraphMatchPredicate::new("has-job", pattern);
        assert!(predicate.test(&room_with_jobs(1)));
        assert!(predicate.test(&room_with_jobs(3)));
        assert!(!predicate.test(&room_with_jobs(0)));
    }

    #[test]
    fn combinators_compose() {
        let one = BigraphIsoPredicate::new("one", &room_with_jobs(1));
        let two = BigraphIsoPredicate::new("two", &room_with_jobs(2));
        let either = OrPredicate::new("either", vec![Box::new(one), Box::new(two)]);
        assert!(either.test(&room_with_jobs(1)));
        assert!(!either.test(&room_with_jobs(0)));

        let one = BigraphIsoPredicate::new("one", &room_with_jobs(1));
        let two = BigraphIsoPredicate::new("two", &room_with_jobs(2));
        let both = AndPredicate::new("both", vec![Box::new(one), Box::new(two)]);
        assert!(!both.test(&room_with_jobs(1)));
    }
}

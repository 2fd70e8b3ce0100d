//! Simulation of bigraphical reactive systems: canonical forms,
//! matching, reaction building and model checking.
//!
//! The crate is layered the way the exploration loop consumes it:
//! [`encoding`] turns states into canonical strings for deduplication,
//! [`matching`] finds every occurrence of a rule's redex in an agent,
//! [`reaction`] assembles successor states by composition, and
//! [`modelchecking`] drives the loop, building a [`reaction_graph`]
//! and evaluating [`predicates`] with witness paths.

#![warn(missing_docs)]

pub mod encoding;
pub mod matching;
pub mod modelchecking;
pub mod predicates;
pub mod reaction;
pub mod reaction_graph;

pub use crate::encoding::canonical;
pub use crate::matching::{match_agent, Matcher, MatchingError, Occurrence};
pub use crate::modelchecking::{
    CheckerStatus, Listeners, ModelChecker, ModelCheckingOptions, ModelCheckingResult,
    ReactiveSystem, SimulationError, SimulationStrategy,
};
pub use crate::predicates::{
    AndPredicate, BigraphIsoPredicate, OrPredicate, ReactiveSystemPredicate,
    SubBigraphMatchPredicate,
};
pub use crate::reaction::{
    build_ground_reaction, build_parametric_reaction, build_reaction, InstantiationMap,
    ReactionError, ReactionRule,
};
pub use crate::reaction_graph::{ReactionGraph, ReactionGraphStats};

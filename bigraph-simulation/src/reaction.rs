//! Reaction rules and the construction of reaction results.
//!
//! A rule rewrites a matched redex image into its reactum. The
//! successor agent is assembled by composition: the residual context is
//! composed over the reactum, which is itself composed over the
//! matched parameters, juxtaposed in instantiation order.

use log::trace;
use thiserror::Error;

use bigraph_core::{compose, parallel_product, Bigraph, CompositionError};

use crate::matching::Occurrence;

/// Errors raised while validating a reaction rule.
#[derive(Debug, Error)]
pub enum ReactionError {
    /// Redex and reactum are built over different signatures.
    #[error("redex and reactum carry different signatures")]
    SignatureMismatch,
    /// The outer interfaces (root counts) of redex and reactum differ.
    #[error("redex has {redex} root(s) but reactum has {reactum}")]
    RootCountMismatch {
        /// Root count of the redex.
        redex: usize,
        /// Root count of the reactum.
        reactum: usize,
    },
    /// A rule operand carries inner names.
    #[error("rule operands must not have inner names")]
    InnerNamesInRule,
    /// The instantiation map does not cover every reactum site.
    #[error("instantiation map covers {actual} site(s), reactum has {expected}")]
    InstantiationArity {
        /// Number of reactum sites.
        expected: usize,
        /// Number of map entries.
        actual: usize,
    },
    /// An instantiation entry points past the redex's sites.
    #[error("instantiation entry {entry} exceeds redex site count {sites}")]
    InstantiationRange {
        /// The offending entry.
        entry: usize,
        /// Number of redex sites.
        sites: usize,
    },
}

/// Maps each reactum site onto the redex site whose parameter fills
/// it. Entries may repeat (duplicating a parameter) or omit redex
/// sites (discarding a parameter).
#[derive(Debug, Clone)]
pub struct InstantiationMap {
    map: Vec<usize>,
}

impl InstantiationMap {
    /// The identity map over `sites` sites.
    pub fn identity(sites: usize) -> Self {
        Self {
            map: (0..sites).collect(),
        }
    }

    /// An explicit map, one entry per reactum site.
    pub fn new(map: Vec<usize>) -> Self {
        Self { map }
    }

    /// The redex site filling reactum site `reactum_site`.
    pub fn target(&self, reactum_site: usize) -> usize {
        self.map[reactum_site]
    }

    /// The number of reactum sites covered.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// A reaction rule: redex, reactum and instantiation map.
#[derive(Debug, Clone)]
pub struct ReactionRule {
    name: String,
    redex: Bigraph,
    reactum: Bigraph,
    instantiation: InstantiationMap,
}

impl ReactionRule {
    /// Creates a rule with the identity instantiation map.
    pub fn new(
        name: impl Into<String>,
        redex: Bigraph,
        reactum: Bigraph,
    ) -> Result<Self, ReactionError> {
        let instantiation = InstantiationMap::identity(reactum.site_count());
        Self::with_instantiation(name, redex, reactum, instantiation)
    }

    /// Creates a rule with an explicit instantiation map.
    pub fn with_instantiation(
        name: impl Into<String>,
        redex: Bigraph,
        reactum: Bigraph,
        instantiation: InstantiationMap,
    ) -> Result<Self, ReactionError> {
        if redex.signature() != reactum.signature() {
            return Err(ReactionError::SignatureMismatch);
        }
        if redex.root_count() != reactum.root_count() {
            return Err(ReactionError::RootCountMismatch {
                redex: redex.root_count(),
                reactum: reactum.root_count(),
            });
        }
        if redex.inner_count() > 0 || reactum.inner_count() > 0 {
            return Err(ReactionError::InnerNamesInRule);
        }
        if instantiation.len() != reactum.site_count() {
            return Err(ReactionError::InstantiationArity {
                expected: reactum.site_count(),
                actual: instantiation.len(),
            });
        }
        for i in 0..instantiation.len() {
            let entry = instantiation.target(i);
            if entry >= redex.site_count() {
                return Err(ReactionError::InstantiationRange {
                    entry,
                    sites: redex.site_count(),
                });
            }
        }
        Ok(Self {
            name: name.into(),
            redex,
            reactum,
            instantiation,
        })
    }

    /// The rule's name, used for transition labels and logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pattern to be matched.
    pub fn redex(&self) -> &Bigraph {
        &self.redex
    }

    /// The replacement.
    pub fn reactum(&self) -> &Bigraph {
        &self.reactum
    }

    /// The instantiation map.
    pub fn instantiation(&self) -> &InstantiationMap {
        &self.instantiation
    }
}

/// Builds the successor for a match without parameters: the reactum
/// composed directly into the residual context and its identity
/// wirings.
pub fn build_ground_reaction(
    occurrence: &Occurrence,
    rule: &ReactionRule,
) -> Result<Bigraph, CompositionError> {
    debug_assert!(occurrence.parameters.is_empty());
    compose(&occurrence.context, rule.reactum())
}

/// Builds the successor for a parametric match: parameters are
/// juxtaposed in instantiation order, composed under the reactum and
/// its redex identity, and the result composed into the context.
pub fn build_parametric_reaction(
    occurrence: &Occurrence,
    rule: &ReactionRule,
) -> Result<Bigraph, CompositionError> {
    let image = if rule.reactum().site_count() > 0 {
        let mut product = occurrence.parameters[rule.instantiation().target(0)].clone();
        for reactum_site in 1..rule.reactum().site_count() {
            let parameter = &occurrence.parameters[rule.instantiation().target(reactum_site)];
            product = parallel_product(&product, parameter)?;
        }
        let with_identity = parallel_product(rule.reactum(), &occurrence.redex_identity)?;
        compose(&with_identity, &product)?
    } else {
        // Every parameter is discarded by the instantiation map.
        rule.reactum().clone()
    };
    compose(&occurrence.context, &image)
}

/// Builds the successor for an occurrence, dispatching on whether the
/// match captured parameters.
pub fn build_reaction(
    occurrence: &Occurrence,
    rule: &ReactionRule,
) -> Result<Bigraph, CompositionError> {
    trace!(
        "building reaction '{}' over {} parameter(s)",
        rule.name(),
        occurrence.parameters.len()
    );
    if occurrence.parameters.is_empty() {
        build_ground_reaction(occurrence, rule)
    } else {
        build_parametric_reaction(occurrence, rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::canonical;
    use crate::matching::match_agent;
    use bigraph_core::{BigraphBuilder, Control, LinkId, Signature};

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
    fn add_job_rule() -> ReactionRule {
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

        ReactionRule::new("addJob", redex, reactum).unwrap()
    }

    #[test]
    fn applying_a_rule_adds_one_job() {
        let agent0 = agent(0);
        let rule = add_job_rule();
        let occurrences = match_agent(&agent0, rule.redex()).unwrap();
        assert_eq!(occurrences.len(), 1);
        let successor = build_reaction(&occurrences[0], &rule).unwrap();
        assert!(successor.is_ground());
        assert_eq!(canonical(&successor), canonical(&agent(1)));
    }

    #[test]
    fn parameters_survive_the_rewrite() {
        let agent2 = agent(2);
        let rule = add_job_rule();
        let occurrences = match_agent(&agent2, rule.redex()).unwrap();
        assert_eq!(occurrences.len(), 1);
        let successor = build_reaction(&occurrences[0], &rule).unwrap();
        assert_eq!(canonical(&successor), canonical(&agent(3)));
    }

    #[test]
    fn reaction_building_is_deterministic() {
        let agent1 = agent(1);
        let rule = add_job_rule();
        let occurrences = match_agent(&agent1, rule.redex()).unwrap();
        let a = build_reaction(&occurrences[0], &rule).unwrap();
        let b = build_reaction(&occurrences[0], &rule).unwrap();
        assert_eq!(canonical(&a), canonical(&b));
    }

    #[test]
    fn instantiation_map_duplicates_a_parameter() {
        // Redex: Room(site); reactum: Room(site) | Room(site) with both
        // sites instantiated from the single redex site.
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let room = builder.add_node("Room", root.into()).unwrap();
        builder.add_site(room.into()).unwrap();
        let redex = builder.finish().unwrap();

        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let left = builder.add_node("Room", root.into()).unwrap();
        builder.add_site(left.into()).unwrap();
        let right = builder.add_node("Room", root.into()).unwrap();
        builder.add_site(right.into()).unwrap();
        let reactum = builder.finish().unwrap();

        let rule = ReactionRule::with_instantiation(
            "split",
            redex,
            reactum,
            InstantiationMap::new(vec![0, 0]),
        )
        .unwrap();

        // Agent: Room containing one Job.
        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let room = builder.add_node("Room", root.into()).unwrap();
        builder.add_node("Job", room.into()).unwrap();
        let agent = builder.finish().unwrap();

        let occurrences = match_agent(&agent, rule.redex()).unwrap();
        assert_eq!(occurrences.len(), 1);
        let successor = build_reaction(&occurrences[0], &rule).unwrap();
        // Two Rooms, each holding a copy of the Job.
        assert_eq!(successor.node_count(), 4);
        let jobs = successor
            .nodes()
            .filter(|n| successor.control_of(*n).name() == "Job")
            .count();
        assert_eq!(jobs, 2);
    }

    #[test]
    fn rule_validation_rejects_mismatches() {
        let redex = agent(0);
        let mut builder = BigraphBuilder::new(sig());
        builder.add_root();
        builder.add_root();
        let two_roots = builder.finish().unwrap();
        assert!(matches!(
            ReactionRule::new("bad", redex.clone(), two_roots),
            Err(ReactionError::RootCountMismatch { .. })
        ));

        let mut builder = BigraphBuilder::new(sig());
        let root = builder.add_root();
        let room = builder.add_node("Room", root.into()).unwrap();
        builder.add_site(room.into()).unwrap();
        let reactum_with_site = builder.finish().unwrap();
        // Identity map entry 0 exceeds the siteless redex.
        assert!(matches!(
            ReactionRule::new("bad", redex, reactum_with_site),
            Err(ReactionError::InstantiationRange { .. })
        ));
    }
}

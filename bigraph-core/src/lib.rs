//! Data model and operations for pure bigraphs.
//!
//! A bigraph combines a *place forest* (roots containing nodes and
//! sites) with a *link hypergraph* (edges and outer names connecting
//! node ports and inner names) over a shared [`Signature`] of controls.
//! This crate provides the arena-stored representation, a consuming
//! builder, and the composition operations (`compose`,
//! `parallel_product`, elementary linkings) that reaction building is
//! made of; matching and simulation live in `bigraph-simulation`.

#![warn(missing_docs)]

pub mod bigraph;
pub mod builder;
pub mod error;
pub mod index;
pub mod ops;
pub mod signature;

pub use crate::bigraph::Bigraph;
pub use crate::builder::BigraphBuilder;
pub use crate::error::{BigraphError, CompositionError};
pub use crate::index::{
    ControlId, EdgeId, InnerId, LinkId, NodeId, OuterId, PlaceId, PointId, RootId, SiteId,
};
pub use crate::ops::{barren, compose, identity_linking, parallel_product, substitution};
pub use crate::signature::{Control, ControlStatus, Signature};

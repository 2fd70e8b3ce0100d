//! Error types for building and combining bigraphs.

use thiserror::Error;

/// Errors raised while constructing a bigraph.
#[derive(Debug, Error)]
pub enum BigraphError {
    /// The named control does not exist in the signature.
    #[error("unknown control '{0}'")]
    UnknownControl(String),
    /// A link or control name was used twice.
    #[error("duplicate name '{0}'")]
    DuplicateName(String),
    /// A port index exceeded the arity of the node's control.
    #[error("port {port} out of range for control '{control}' with arity {arity}")]
    PortOutOfRange {
        /// The offending port index.
        port: usize,
        /// The control of the node.
        control: String,
        /// The arity of that control.
        arity: usize,
    },
    /// A port that is already connected was connected again.
    #[error("port {port} of node {node} is already connected")]
    PortOccupied {
        /// The node whose port was addressed.
        node: usize,
        /// The occupied port index.
        port: usize,
    },
    /// An inner name that is already connected was connected again.
    #[error("inner name '{0}' is already connected")]
    InnerOccupied(String),
    /// A child was attached under a node whose control is atomic.
    #[error("atomic control '{0}' cannot have children")]
    AtomicParent(String),
    /// An entity index did not belong to the builder it was passed to.
    #[error("entity index out of range")]
    InvalidHandle,
}

/// Errors raised by the composition operations.
#[derive(Debug, Error)]
pub enum CompositionError {
    /// The operands carry different signatures.
    #[error("operands carry incompatible signatures")]
    IncompatibleSignature,
    /// Interfaces do not line up (site/root counts or name sets).
    #[error("incompatible interfaces: {0}")]
    IncompatibleInterface(String),
    /// Assembling the result violated a construction invariant.
    #[error(transparent)]
    Build(#[from] BigraphError),
}

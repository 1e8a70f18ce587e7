//! Error and warning types.

use thiserror::Error;

/// Errors raised while building or driving a state graph.
///
/// Construction faults (`EmptyLeaf`, `DuplicateLeaf`, `DuplicateState`,
/// `EmptyGraph`, `DimensionMismatch` on connect) mean the graph was authored
/// wrong. Consistency faults (`NotActive`, `NotASuccessor`) mean a broken
/// graph or a broken [`Selector`](crate::Selector); the engine never
/// recovers from them on its own.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("state graph has no states")]
    EmptyGraph,
    #[error("leaf `{0}` has no candidate values")]
    EmptyLeaf(String),
    #[error("state `{state}` already owns a leaf named `{leaf}`")]
    DuplicateLeaf { state: String, leaf: String },
    #[error("graph already contains a state named `{0}`")]
    DuplicateState(String),
    #[error("no state named `{0}` in graph")]
    UnknownState(String),
    #[error("direction has {found} components, graph uses {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("state `{0}` was pulled while not active")]
    NotActive(String),
    #[error("selector chose `{to}`, which is not a successor of `{from}`")]
    NotASuccessor { from: String, to: String },
    #[error("state `{0}` has no outgoing edges")]
    NoOutgoingEdges(String),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Recoverable conditions the engine worked around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The requested initial state wasn't in the graph, so `substituted`
    /// was used instead.
    UnknownInitialState { requested: String, substituted: String },
}

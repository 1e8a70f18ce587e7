//! Core node trait and identifier types.

use petgraph::graph::NodeIndex;

use crate::error::Result;

/// One joint pull: a `(leaf name, value)` pair for every leaf of a state,
/// in the order the leaves were declared.
pub type Frame<V> = Vec<(String, V)>;

/// Unique identifier for a state within a [`StateGraph`](crate::StateGraph).
///
/// Returned by [`StateGraph::add_state`](crate::StateGraph::add_state). Ids are
/// only meaningful for the graph that issued them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateId(pub(crate) NodeIndex);

impl StateId {
    /// Position of the state in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }
}

/// The capability shared by leaves and states.
///
/// A node is an infinite value source with an activation lifecycle:
///
/// - [`activate`](Node::activate) resets it and makes it ready to pull
/// - [`pull`](Node::pull) produces the next value
/// - [`deactivate`](Node::deactivate) tears it down again
///
/// `pull` returns `Ok(None)` when the node has run out of values. The built-in
/// nodes never do, but the end of a sequence is always reported through `None`
/// rather than being hidden.
pub trait Node {
    /// What one pull produces.
    type Output;

    /// Name of the node. Unique among its siblings.
    fn name(&self) -> &str;

    /// Reset the node and prepare it for pulling.
    fn activate(&mut self);

    /// Tear the node down. Never fails.
    fn deactivate(&mut self);

    /// Produce the next value.
    fn pull(&mut self) -> Result<Option<Self::Output>>;
}

//! Transition policies

use crate::error::{Error, Result};
use crate::graph::{Direction, StateGraph};
use crate::node::StateId;

/// Decides which state the engine should be in next.
///
/// Called by the [`Engine`](crate::Engine) once per pull, before any
/// transition happens. Implementations read the graph but never change it, and
/// must return either `active` itself or a direct successor of `active`.
/// The engine rejects anything else with [`Error::NotASuccessor`].
///
/// A `None` stimulus means the host has no preference.
///
/// # Example
///
/// A selector that ignores its stimulus and always takes the first edge:
///
/// ```
/// use stimmung::{Result, Selector, StateGraph, StateId};
///
/// struct FirstEdge;
///
/// impl<V> Selector<V> for FirstEdge {
///     type Stimulus = ();
///
///     fn select(&self, graph: &StateGraph<V>, active: StateId, _: Option<&()>) -> Result<StateId> {
///         Ok(graph.outgoing(active).next().map_or(active, |(target, _)| target))
///     }
/// }
/// ```
pub trait Selector<V> {
    /// What the host feeds the engine to steer it.
    type Stimulus;

    fn select(
        &self,
        graph: &StateGraph<V>,
        active: StateId,
        stimulus: Option<&Self::Stimulus>,
    ) -> Result<StateId>;
}

/// Follows the outgoing edge whose direction has the largest dot product with
/// the stimulus.
///
/// - no stimulus: stay on the active state
/// - ties: the edge connected first wins
/// - a stimulus with the wrong number of components is rejected with
///   [`Error::DimensionMismatch`]
/// - a state with no outgoing edges gives [`Error::NoOutgoingEdges`]
#[derive(Clone, Copy, Debug, Default)]
pub struct DotProductSelector;

impl<V: Clone> Selector<V> for DotProductSelector {
    type Stimulus = Direction;

    fn select(
        &self,
        graph: &StateGraph<V>,
        active: StateId,
        stimulus: Option<&Direction>,
    ) -> Result<StateId> {
        let stimulus = match stimulus {
            Some(stimulus) => stimulus,
            None => return Ok(active),
        };

        if let Some(expected) = graph.dimension() {
            if stimulus.len() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    found: stimulus.len(),
                });
            }
        }

        let mut best: Option<(StateId, f32)> = None;
        for (target, direction) in graph.outgoing(active) {
            let score = direction.dot(stimulus);
            // strictly greater, so earlier edges win ties
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((target, score));
            }
        }

        best.map(|(target, _)| target)
            .ok_or_else(|| Error::NoOutgoingEdges(graph.label(active)))
    }
}

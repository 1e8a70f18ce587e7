//! State graph - owns states and the direction vectors on their edges

use delegate::delegate;
use hashbrown::HashMap;
use itertools::{EitherOrBoth, Itertools};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::error::{Error, Result};
use crate::node::{Node, StateId};
use crate::nodes::State;

/// Leaf name → every candidate value any state uses for that leaf.
pub type ValueMap<V> = HashMap<String, Vec<V>>;

/// The meaning of travelling along an edge, as a vector.
///
/// Stimuli for the [`DotProductSelector`](crate::DotProductSelector) are
/// directions too: the selector follows the edge whose direction lines up best
/// with the stimulus.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Direction(Vec<f32>);

impl Direction {
    pub fn new(components: Vec<f32>) -> Self {
        Self(components)
    }

    /// A one-hot direction: `dim` components, all zero except `axis`.
    ///
    /// An `axis` outside `0..dim` gives the zero vector.
    pub fn axis(dim: usize, axis: usize) -> Self {
        Self((0..dim).map(|i| if i == axis { 1.0 } else { 0.0 }).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Inner product. Missing components of the shorter vector count as zero.
    pub fn dot(&self, other: &Direction) -> f32 {
        self.0
            .iter()
            .zip_longest(other.0.iter())
            .map(|pair| match pair {
                EitherOrBoth::Both(a, b) => a * b,
                EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => 0.0,
            })
            .sum()
    }
}

impl From<Vec<f32>> for Direction {
    fn from(components: Vec<f32>) -> Self {
        Self(components)
    }
}

impl<const N: usize> From<[f32; N]> for Direction {
    fn from(components: [f32; N]) -> Self {
        Self(components.to_vec())
    }
}

type InnerGraph<V> = petgraph::graph::Graph<State<V>, Direction>;

/// A directed graph of [`State`]s.
///
/// States are looked up by name or by the [`StateId`] returned from
/// [`add_state`](Self::add_state). Every edge carries a [`Direction`]; all
/// directions in one graph have the same number of components, fixed by the
/// first edge added.
///
/// A state that should be able to "stay" needs an explicit self-loop.
///
/// # Edge order
///
/// [`outgoing`](Self::outgoing) lists edges in the order they were first
/// connected. Selectors rely on this for deterministic tie-breaking.
pub struct StateGraph<V> {
    graph: InnerGraph<V>,
    indices: HashMap<String, NodeIndex>,
    dimension: Option<usize>,
}

impl<V> Default for StateGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> StateGraph<V> {
    pub fn new() -> Self {
        Self::with_capacity(16, 32)
    }

    pub fn with_capacity(states: usize, edges: usize) -> Self {
        Self {
            graph: InnerGraph::with_capacity(states, edges),
            indices: HashMap::with_capacity(states),
            dimension: None,
        }
    }

    delegate! {
        to self.graph {
            /// Number of states in the graph.
            pub fn node_count(&self) -> usize;
            /// Number of edges, self-loops included.
            pub fn edge_count(&self) -> usize;
        }
    }

    /// Component count shared by every edge, once an edge exists.
    #[inline]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn id(&self, name: &str) -> Option<StateId> {
        self.indices.get(name).copied().map(StateId)
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.graph.node_weight(id.0).is_some()
    }

    pub fn state(&self, id: StateId) -> Option<&State<V>> {
        self.graph.node_weight(id.0)
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> Option<&mut State<V>> {
        self.graph.node_weight_mut(id.0)
    }

    /// The first state added, if any.
    pub fn first(&self) -> Option<StateId> {
        self.graph.node_indices().next().map(StateId)
    }

    /// All states in insertion order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State<V>)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (StateId(idx), &self.graph[idx]))
    }

    /// Outgoing edges of `id` as `(target, direction)`, in connection order.
    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = (StateId, &Direction)> + '_ {
        self.graph
            .edges(id.0)
            .sorted_by_key(|edge| edge.id())
            .map(|edge| (StateId(edge.target()), edge.weight()))
    }

    pub fn has_edge(&self, from: StateId, to: StateId) -> bool {
        self.graph.find_edge(from.0, to.0).is_some()
    }
}

impl<V: Clone> StateGraph<V> {
    /// Add a state, returning its id. State names must be unique.
    pub fn add_state(&mut self, state: State<V>) -> Result<StateId> {
        if self.indices.contains_key(state.name()) {
            return Err(Error::DuplicateState(state.name().to_owned()));
        }

        let name = state.name().to_owned();
        let idx = self.graph.add_node(state);
        self.indices.insert(name, idx);

        Ok(StateId(idx))
    }

    /// Connect `from` to `to`.
    ///
    /// Connecting a pair that is already connected replaces the direction and
    /// keeps the edge's original place in the enumeration order.
    pub fn connect(&mut self, from: StateId, to: StateId, direction: impl Into<Direction>) -> Result<()> {
        let direction = direction.into();

        for id in [from, to].iter() {
            if !self.contains(*id) {
                return Err(Error::UnknownState(self.label(*id)));
            }
        }

        match self.dimension {
            Some(expected) if expected != direction.len() => {
                return Err(Error::DimensionMismatch {
                    expected,
                    found: direction.len(),
                });
            }
            _ => self.dimension = Some(direction.len()),
        }

        self.graph.update_edge(from.0, to.0, direction);
        Ok(())
    }

    /// [`connect`](Self::connect), by state name.
    pub fn connect_names(&mut self, from: &str, to: &str, direction: impl Into<Direction>) -> Result<()> {
        let from = self.id(from).ok_or_else(|| Error::UnknownState(from.to_owned()))?;
        let to = self.id(to).ok_or_else(|| Error::UnknownState(to.to_owned()))?;
        self.connect(from, to, direction)
    }

    /// Name of a state, or `#<index>` for an id this graph doesn't know.
    pub fn label(&self, id: StateId) -> String {
        match self.state(id) {
            Some(state) => state.name().to_owned(),
            None => format!("#{}", id.index()),
        }
    }

    /// Collect, per leaf name, the candidate values of every leaf with that
    /// name across all states. Each list is deduplicated and keeps the order
    /// values were first seen in.
    pub fn value_map(&self) -> ValueMap<V>
    where
        V: PartialEq,
    {
        let mut map = ValueMap::new();

        for (_, state) in self.states() {
            for leaf in state.leaves() {
                let values: &mut Vec<V> = map.entry(leaf.name().to_owned()).or_default();
                for candidate in leaf.candidates() {
                    if !values.contains(candidate) {
                        values.push(candidate.clone());
                    }
                }
            }
        }

        map
    }
}

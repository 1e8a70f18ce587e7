//! Randomized looping leaf.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::trace;

use crate::error::{Error, Result};
use crate::node::Node;

/// An infinite value source that picks uniformly from a fixed candidate list.
///
/// In a layering setup a leaf is one loop slot (say `"drums"`), and its
/// candidates are the clips that may play in that slot while its owning
/// [`State`](crate::State) is active. Values may repeat across pulls.
///
/// # Example
///
/// ```
/// use stimmung::{Leaf, Node};
///
/// let mut drums = Leaf::with_seed("drums", vec!["drums.wav", "drums2.wav"], 7)?;
/// drums.activate();
///
/// let (name, clip) = drums.pull()?.unwrap();
/// assert_eq!(name, "drums");
/// assert!(clip == "drums.wav" || clip == "drums2.wav");
/// assert_eq!(drums.pulls(), 1);
/// # Ok::<(), stimmung::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Leaf<V> {
    name: String,
    candidates: Vec<V>,
    pulls: u64,
    rng: StdRng,
}

impl<V> Leaf<V> {
    /// Create a leaf seeded from OS entropy.
    ///
    /// Returns [`Error::EmptyLeaf`] if `candidates` is empty.
    pub fn new(name: impl Into<String>, candidates: Vec<V>) -> Result<Self> {
        Self::with_rng(name.into(), candidates, StdRng::from_entropy())
    }

    /// Create a leaf with a fixed seed, for reproducible sequences.
    pub fn with_seed(name: impl Into<String>, candidates: Vec<V>, seed: u64) -> Result<Self> {
        Self::with_rng(name.into(), candidates, StdRng::seed_from_u64(seed))
    }

    fn with_rng(name: String, candidates: Vec<V>, rng: StdRng) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::EmptyLeaf(name));
        }

        Ok(Self {
            name,
            candidates,
            pulls: 0,
            rng,
        })
    }

    #[inline]
    pub fn candidates(&self) -> &[V] {
        &self.candidates
    }

    /// Number of pulls since the leaf was last activated.
    #[inline]
    pub fn pulls(&self) -> u64 {
        self.pulls
    }
}

impl<V: Clone> Node for Leaf<V> {
    type Output = (String, V);

    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self) {
        self.pulls = 0;
    }

    fn deactivate(&mut self) {
        trace!(leaf = %self.name, loops = self.pulls, "leaf deactivated");
        self.pulls = 0;
    }

    fn pull(&mut self) -> Result<Option<(String, V)>> {
        let value = self.candidates.choose(&mut self.rng).cloned();

        Ok(value.map(|v| {
            self.pulls += 1;
            (self.name.clone(), v)
        }))
    }
}

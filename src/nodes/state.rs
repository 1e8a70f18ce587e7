//! Graph state - a bundle of leaves stepped in lockstep

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::node::{Frame, Node};
use crate::nodes::Leaf;

/// Joint position of all leaves while the state is active
#[derive(Clone, Copy, Debug, Default)]
struct JointCursor {
    steps: u64,
}

/// A named bundle of [`Leaf`]s.
///
/// While active, every [`pull`](Node::pull) advances each leaf exactly once and
/// returns one `(name, value)` pair per leaf, so no leaf ever runs ahead of
/// another. Pulling a state that isn't active is an error
/// ([`Error::NotActive`]).
#[derive(Clone, Debug)]
pub struct State<V> {
    name: String,
    leaves: Vec<Leaf<V>>,
    cursor: Option<JointCursor>,
}

impl<V> State<V> {
    /// Create a state from its leaves.
    ///
    /// Leaf names must be unique within the state.
    pub fn new(name: impl Into<String>, leaves: Vec<Leaf<V>>) -> Result<Self>
    where
        V: Clone,
    {
        let name = name.into();

        if let Some(dup) = leaves.iter().map(|leaf| leaf.name()).duplicates().next() {
            return Err(Error::DuplicateLeaf {
                state: name,
                leaf: dup.to_owned(),
            });
        }

        Ok(Self {
            name,
            leaves,
            cursor: None,
        })
    }

    #[inline]
    pub fn leaves(&self) -> &[Leaf<V>] {
        &self.leaves
    }

    /// Look up one of this state's leaves by name
    pub fn leaf(&self, name: &str) -> Option<&Leaf<V>>
    where
        V: Clone,
    {
        self.leaves.iter().find(|leaf| leaf.name() == name)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.cursor.is_some()
    }

    /// Joint pulls since activation, or `None` if inactive
    #[inline]
    pub fn steps(&self) -> Option<u64> {
        self.cursor.map(|c| c.steps)
    }
}

impl<V: Clone> Node for State<V> {
    type Output = Frame<V>;

    fn name(&self) -> &str {
        &self.name
    }

    fn activate(&mut self) {
        for leaf in self.leaves.iter_mut() {
            leaf.activate();
        }
        self.cursor = Some(JointCursor::default());
    }

    fn deactivate(&mut self) {
        for leaf in self.leaves.iter_mut() {
            leaf.deactivate();
        }
        self.cursor = None;
    }

    fn pull(&mut self) -> Result<Option<Frame<V>>> {
        let cursor = match self.cursor.as_mut() {
            Some(cursor) => cursor,
            None => return Err(Error::NotActive(self.name.clone())),
        };

        // Stops at the first exhausted leaf; a partial frame is never returned
        let frame = self
            .leaves
            .iter_mut()
            .map(|leaf| leaf.pull())
            .collect::<Result<Option<Frame<V>>>>()?;

        if frame.is_some() {
            cursor.steps += 1;
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band() -> State<&'static str> {
        State::new(
            "B",
            vec![
                Leaf::with_seed("bass", vec!["bass.wav"], 1).unwrap(),
                Leaf::with_seed("drums", vec!["drums2.wav"], 2).unwrap(),
                Leaf::with_seed("sustain", vec!["sustain.wav", "chords.wav"], 3).unwrap(),
                Leaf::with_seed("piano", vec!["piano.wav"], 4).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_leaf_names() {
        let err = State::new(
            "A",
            vec![
                Leaf::new("bass", vec![1]).unwrap(),
                Leaf::new("bass", vec![2]).unwrap(),
            ],
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::DuplicateLeaf {
                state: "A".into(),
                leaf: "bass".into()
            }
        );
    }

    #[test]
    fn pull_before_activate_is_an_error() {
        let mut state = band();
        assert_eq!(state.pull().unwrap_err(), Error::NotActive("B".into()));
    }

    #[test]
    fn pull_after_deactivate_is_an_error() {
        let mut state = band();
        state.activate();
        state.pull().unwrap();
        state.deactivate();

        assert!(!state.is_active());
        assert_eq!(state.pull().unwrap_err(), Error::NotActive("B".into()));
    }

    #[test]
    fn leaves_advance_in_lockstep() {
        let mut state = band();
        state.activate();

        for n in 1..=10u64 {
            let frame = state.pull().unwrap().unwrap();
            let names: Vec<&str> = frame.iter().map(|(name, _)| name.as_str()).collect();
            assert_eq!(names, ["bass", "drums", "sustain", "piano"]);

            assert!(state.leaves().iter().all(|leaf| leaf.pulls() == n));
            assert_eq!(state.steps(), Some(n));
        }
    }

    #[test]
    fn reactivation_resets_leaf_counters() {
        let mut state = band();
        state.activate();
        for _ in 0..5 {
            state.pull().unwrap();
        }

        state.activate();
        assert!(state.leaves().iter().all(|leaf| leaf.pulls() == 0));
        assert_eq!(state.steps(), Some(0));
    }

    #[test]
    fn empty_state_yields_empty_frames() {
        let mut state = State::<u8>::new("silence", vec![]).unwrap();
        state.activate();
        assert_eq!(state.pull().unwrap(), Some(vec![]));
    }
}

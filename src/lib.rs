//! Stimmung - a stimulus-driven state graph for layered audio loops
//!
//! A [`StateGraph`] holds musical [`State`]s, each a bundle of looping
//! [`Leaf`] slots ("drums", "bass", ...). Edges carry a [`Direction`].
//! The [`Engine`] walks the graph: before every pull it asks a [`Selector`]
//! where the current stimulus points, switches state if needed, and returns one
//! [`Frame`] of `(leaf, clip)` pairs for the host's loop launcher.
//!
//! Design principles:
//! - No audio here; playback belongs to a [`Playback`] collaborator
//! - Pull-based, one frame per call, no hidden threads
//! - Stimulus updates via message ring buffers, not shared state
//! - Transition policy is pluggable

pub mod error;
mod engine;
mod graph;
mod node;
pub mod nodes;
mod playback;
mod selector;

pub use engine::{Engine, EngineConfig, Message, Phase, StimulusHandle};
pub use error::{Error, Result, Warning};
pub use graph::{Direction, StateGraph, ValueMap};
pub use node::{Frame, Node, StateId};
pub use nodes::{Leaf, State};
pub use playback::Playback;
pub use selector::{DotProductSelector, Selector};

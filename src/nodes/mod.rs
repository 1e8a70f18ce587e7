//! Built-in nodes.
//!
//! - [`Leaf`] - one loop slot, yields a random candidate value per pull
//! - [`State`] - a bundle of leaves, yields a [`Frame`](crate::Frame) per pull
//!
//! Both implement [`Node`](crate::Node).

pub mod leaf;
pub mod state;

pub use leaf::Leaf;
pub use state::State;

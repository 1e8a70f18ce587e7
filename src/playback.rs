//! The playback collaborator.
//!
//! `stimmung` doesn't play audio. It decides *which* clips should play, and
//! hands that decision to whatever loop launcher the host uses through the
//! [`Playback`] trait:
//!
//! 1. once, at start-up: every track (leaf name) and every clip it may play,
//!    via [`Playback::initialize`]
//! 2. whenever the launcher reports [`needs_values`](Playback::needs_values),
//!    usually at a loop boundary: the latest [`Frame`], via
//!    [`Playback::update_pending`]
//!
//! [`Engine::prime`](crate::Engine::prime) and
//! [`Engine::tick`](crate::Engine::tick) drive this protocol.

use crate::graph::ValueMap;

/// A loop launcher the engine can feed.
pub trait Playback<V> {
    /// Register every track and the clips it may play.
    fn initialize(&mut self, tracks: &ValueMap<V>);

    /// Whether the launcher wants the next set of clips yet.
    fn needs_values(&self) -> bool;

    /// Queue the clips of one frame, as `(track, clip)` pairs.
    fn update_pending(&mut self, frame: &[(String, V)]);
}

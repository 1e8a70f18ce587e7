//! High-level engine API

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result, Warning};
use crate::graph::{StateGraph, ValueMap};
use crate::node::{Frame, Node, StateId};
use crate::playback::Playback;
use crate::selector::Selector;

/// Control messages accepted by an [`Engine`] through its [`StimulusHandle`].
#[derive(Clone, Debug, PartialEq)]
pub enum Message<T> {
    /// Replace the stimulus (`None` means "keep going").
    SetStimulus(Option<T>),
    /// Stop the engine for good.
    Stop,
}

/// A handle for steering an [`Engine`] from another thread.
///
/// Obtained once from [`Engine::handle`]. Messages go through a lock-free ring
/// buffer and are applied, in order, at the start of the engine's next
/// [`pull_next`](Engine::pull_next). A message is either applied whole or not
/// at all, so the engine never sees a half-written stimulus.
///
/// If the queue is full, the message is handed back as `Err(msg)`.
pub struct StimulusHandle<T> {
    sender: Producer<Message<T>>,
}

impl<T> StimulusHandle<T> {
    pub fn send(&mut self, msg: Message<T>) -> core::result::Result<(), Message<T>> {
        self.sender.push(msg).map_err(|rtrb::PushError::Full(m)| m)
    }

    pub fn set_stimulus(&mut self, stimulus: Option<T>) -> core::result::Result<(), Message<T>> {
        self.send(Message::SetStimulus(stimulus))
    }

    pub fn stop(&mut self) -> core::result::Result<(), Message<T>> {
        self.send(Message::Stop)
    }
}

/// Engine settings.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Capacity of the [`StimulusHandle`] message queue
    pub queue_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { queue_size: 64 }
    }
}

/// Where the engine is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, never pulled. No state is active yet.
    Idle,
    /// Pulled at least once; exactly one state is active.
    Running,
    /// Stopped. Terminal.
    Stopped,
}

/// The transition engine - walks a [`StateGraph`] under the direction of a
/// [`Selector`] and produces one [`Frame`] per pull.
///
/// # Pulling
///
/// [`pull_next`](Self::pull_next) is the only production primitive. Each call:
///
/// 1. applies any messages queued through the [`StimulusHandle`]
/// 2. asks the selector for the next state, given the current stimulus
/// 3. if that state differs from the active one (or nothing is active yet),
///    deactivates the old state and activates the new one
/// 4. pulls one joint frame from the active state
///
/// A transition and a pull always happen in the same call, and the selector
/// runs before every pull, so a new stimulus takes effect on the very next
/// frame.
///
/// # Example
///
/// ```
/// use stimmung::{Direction, DotProductSelector, Engine, Leaf, State, StateGraph};
///
/// let mut graph = StateGraph::new();
/// let a = graph.add_state(State::new("A", vec![Leaf::new("drums", vec!["drums.wav"])?])?)?;
/// let b = graph.add_state(State::new("B", vec![
///     Leaf::new("drums", vec!["drums2.wav"])?,
///     Leaf::new("piano", vec!["piano.wav"])?,
/// ])?)?;
/// graph.connect(a, a, Direction::axis(2, 0))?;
/// graph.connect(a, b, Direction::axis(2, 1))?;
/// graph.connect(b, b, Direction::axis(2, 1))?;
/// graph.connect(b, a, Direction::axis(2, 0))?;
///
/// let mut engine = Engine::new(graph, "A", DotProductSelector, None)?;
/// let frame = engine.pull_next()?.unwrap();
/// assert_eq!(frame, vec![("drums".to_string(), "drums.wav")]);
///
/// engine.set_stimulus(Some(Direction::axis(2, 1)));
/// let frame = engine.pull_next()?.unwrap();
/// assert_eq!(engine.active_name(), "B");
/// assert_eq!(frame.len(), 2);
///
/// engine.stop();
/// assert_eq!(engine.pull_next()?, None);
/// # Ok::<(), stimmung::Error>(())
/// ```
///
/// # Threads
///
/// `pull_next` takes `&mut self`; wrap the engine in a `Mutex` if several
/// threads need to pull. For steering from an input thread, prefer
/// [`handle`](Self::handle).
pub struct Engine<V, S: Selector<V>> {
    graph: StateGraph<V>,
    selector: S,
    active: StateId,
    stimulus: Option<S::Stimulus>,
    phase: Phase,

    receiver: Consumer<Message<S::Stimulus>>,
    sender: Option<Producer<Message<S::Stimulus>>>,

    warnings: Vec<Warning>,
}

impl<V: Clone, S: Selector<V>> Engine<V, S> {
    /// Create an engine starting at the state named `initial`.
    ///
    /// If no state has that name, the first state added to the graph is used
    /// instead and a [`Warning::UnknownInitialState`] is recorded (see
    /// [`warnings`](Self::warnings)). An empty graph is an error.
    pub fn new(
        graph: StateGraph<V>,
        initial: &str,
        selector: S,
        stimulus: Option<S::Stimulus>,
    ) -> Result<Self> {
        Self::with_config(graph, initial, selector, stimulus, EngineConfig::default())
    }

    pub fn with_config(
        graph: StateGraph<V>,
        initial: &str,
        selector: S,
        stimulus: Option<S::Stimulus>,
        config: EngineConfig,
    ) -> Result<Self> {
        let first = graph.first().ok_or(Error::EmptyGraph)?;

        let mut warnings = Vec::new();
        let active = match graph.id(initial) {
            Some(id) => id,
            None => {
                let substituted = graph.label(first);
                warn!(requested = initial, substituted = %substituted, "initial state not in graph");
                warnings.push(Warning::UnknownInitialState {
                    requested: initial.to_owned(),
                    substituted,
                });
                first
            }
        };

        let (producer, consumer) = RingBuffer::new(config.queue_size);

        Ok(Self {
            graph,
            selector,
            active,
            stimulus,
            phase: Phase::Idle,
            receiver: consumer,
            sender: Some(producer),
            warnings,
        })
    }

    /// Take the engine's [`StimulusHandle`].
    ///
    /// There is only one; later calls return `None`.
    pub fn handle(&mut self) -> Option<StimulusHandle<S::Stimulus>> {
        self.sender.take().map(|sender| StimulusHandle { sender })
    }

    /// Replace the stimulus. The selector sees it on the next pull.
    pub fn set_stimulus(&mut self, stimulus: Option<S::Stimulus>) {
        trace!(present = stimulus.is_some(), "stimulus set");
        self.stimulus = stimulus;
    }

    #[inline]
    pub fn stimulus(&self) -> Option<&S::Stimulus> {
        self.stimulus.as_ref()
    }

    /// Pull the next frame.
    ///
    /// Returns `Ok(None)` once the engine is stopped, or if the active state
    /// runs out of values (which also stops the engine).
    ///
    /// # Errors
    ///
    /// Anything the selector returns, plus [`Error::NotASuccessor`] if it picks
    /// a state that isn't reachable from the active one. On error the active
    /// state is left as it was.
    pub fn pull_next(&mut self) -> Result<Option<Frame<V>>> {
        self.drain_messages();

        if self.phase == Phase::Stopped {
            return Ok(None);
        }

        let target = self
            .selector
            .select(&self.graph, self.active, self.stimulus.as_ref())?;

        if target != self.active && !self.graph.has_edge(self.active, target) {
            return Err(Error::NotASuccessor {
                from: self.graph.label(self.active),
                to: self.graph.label(target),
            });
        }

        if self.phase == Phase::Idle || target != self.active {
            self.transition(target);
        }

        let frame = match self.graph.state_mut(self.active) {
            Some(state) => state.pull()?,
            None => return Err(Error::UnknownState(self.graph.label(self.active))),
        };

        match frame {
            Some(frame) => {
                trace!(state = %self.graph.label(self.active), leaves = frame.len(), "pulled frame");
                Ok(Some(frame))
            }
            None => {
                debug!(state = %self.graph.label(self.active), "active state exhausted");
                self.stop();
                Ok(None)
            }
        }
    }

    /// Stop the engine. Every later [`pull_next`](Self::pull_next) returns
    /// `Ok(None)`.
    pub fn stop(&mut self) {
        if self.phase == Phase::Stopped {
            return;
        }

        if self.phase == Phase::Running {
            if let Some(state) = self.graph.state_mut(self.active) {
                state.deactivate();
            }
        }

        debug!(state = %self.graph.label(self.active), "engine stopped");
        self.phase = Phase::Stopped;
    }

    /// Hand the playback collaborator its track list and first frame.
    ///
    /// Returns whether the engine produced a frame.
    pub fn prime<P: Playback<V>>(&mut self, playback: &mut P) -> Result<bool>
    where
        V: PartialEq,
    {
        playback.initialize(&self.value_map());

        match self.pull_next()? {
            Some(frame) => {
                playback.update_pending(&frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Feed the playback collaborator if it's ready for new values.
    ///
    /// Call once per host frame. Returns `Ok(false)` once the engine has
    /// stopped.
    pub fn tick<P: Playback<V>>(&mut self, playback: &mut P) -> Result<bool> {
        self.drain_messages();

        if self.phase == Phase::Stopped {
            return Ok(false);
        }

        if !playback.needs_values() {
            return Ok(true);
        }

        match self.pull_next()? {
            Some(frame) => {
                playback.update_pending(&frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// See [`StateGraph::value_map`].
    pub fn value_map(&self) -> ValueMap<V>
    where
        V: PartialEq,
    {
        self.graph.value_map()
    }

    #[inline]
    pub fn active(&self) -> StateId {
        self.active
    }

    pub fn active_name(&self) -> &str {
        match self.graph.state(self.active) {
            Some(state) => state.name(),
            None => "",
        }
    }

    pub fn active_state(&self) -> Option<&crate::State<V>> {
        self.graph.state(self.active)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase != Phase::Stopped
    }

    #[inline]
    pub fn graph(&self) -> &StateGraph<V> {
        &self.graph
    }

    #[inline]
    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// Conditions the engine recovered from during construction.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.receiver.pop() {
            match msg {
                Message::SetStimulus(stimulus) => self.set_stimulus(stimulus),
                Message::Stop => self.stop(),
            }
        }
    }

    fn transition(&mut self, target: StateId) {
        if self.phase == Phase::Running {
            if let Some(state) = self.graph.state_mut(self.active) {
                state.deactivate();
            }
        }

        debug!(
            from = %self.graph.label(self.active),
            to = %self.graph.label(target),
            "transition"
        );

        self.active = target;
        if let Some(state) = self.graph.state_mut(target) {
            state.activate();
        }
        self.phase = Phase::Running;
    }
}

//! Drive the four-state "somber" graph with a scripted stimulus
//!
//! Run with: cargo run --example somber
//! Set RUST_LOG=stimmung=trace to watch transitions and leaf loop counts.
//!
//! No audio is played: a stand-in launcher prints the clips it would queue at
//! every loop boundary.

use std::thread::sleep;
use std::time::{Duration, Instant};

use stimmung::{Direction, DotProductSelector, Engine, Leaf, Playback, State, StateGraph, ValueMap};

/// Pretends every loop lasts `loop_len`
struct PrintingLauncher {
    loop_len: Duration,
    last_boundary: Instant,
    loops: usize,
}

impl Playback<&'static str> for PrintingLauncher {
    fn initialize(&mut self, tracks: &ValueMap<&'static str>) {
        let mut names: Vec<_> = tracks.keys().collect();
        names.sort();
        for name in names {
            println!("track {:<8} clips {:?}", name, tracks[name]);
        }
    }

    fn needs_values(&self) -> bool {
        self.last_boundary.elapsed() >= self.loop_len
    }

    fn update_pending(&mut self, frame: &[(String, &'static str)]) {
        self.loops += 1;
        self.last_boundary = Instant::now();

        let clips: Vec<&str> = frame.iter().map(|(_, clip)| *clip).collect();
        println!("loop {:>2}: {}", self.loops, clips.join(", "));
    }
}

fn build_graph() -> stimmung::Result<StateGraph<&'static str>> {
    let mut g = StateGraph::new();

    let sustains = [
        ("Somber", "star.wav"),
        ("SomberCh1", "starchord1.wav"),
        ("SomberCh2", "starchord2.wav"),
        ("SomberCh3", "starchord3.wav"),
    ];
    for (name, sustain) in sustains.iter() {
        g.add_state(State::new(
            *name,
            vec![
                Leaf::new("bass", vec!["bass.wav"])?,
                Leaf::new("drums", vec!["drums2.wav"])?,
                Leaf::new("sustain", vec![*sustain])?,
            ],
        )?)?;
    }

    let to = |axis| Direction::axis(4, axis);

    // the hub loops on itself and reaches every chord
    g.connect_names("Somber", "Somber", to(0))?;
    g.connect_names("Somber", "SomberCh1", to(1))?;
    g.connect_names("Somber", "SomberCh2", to(2))?;
    g.connect_names("Somber", "SomberCh3", to(3))?;

    // every chord can fall back to the hub
    g.connect_names("SomberCh1", "Somber", to(0))?;
    g.connect_names("SomberCh2", "Somber", to(0))?;
    g.connect_names("SomberCh3", "Somber", to(0))?;

    // 1 -> 2 -> 3 -> 1, plus 2 -> 1, 3 -> 1 and 1 -> 3
    g.connect_names("SomberCh1", "SomberCh2", to(2))?;
    g.connect_names("SomberCh2", "SomberCh3", to(3))?;
    g.connect_names("SomberCh3", "SomberCh1", to(1))?;
    g.connect_names("SomberCh2", "SomberCh1", to(1))?;
    g.connect_names("SomberCh1", "SomberCh3", to(3))?;

    Ok(g)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut engine = Engine::new(build_graph()?, "Somber", DotProductSelector, None)?;
    let mut handle = engine.handle().ok_or("handle already taken")?;

    let mut launcher = PrintingLauncher {
        loop_len: Duration::from_millis(250),
        last_boundary: Instant::now(),
        loops: 0,
    };
    engine.prime(&mut launcher)?;

    // hub, hub, chord 1, chord 2, chord 1, chord 3, repeat
    let mut script = [0, 0, 1, 2, 1, 3].iter().cycle().map(|&axis| Direction::axis(4, axis));

    loop {
        if launcher.needs_values() {
            // a full queue just means the engine hasn't caught up; drop it
            let _ = handle.set_stimulus(script.next());
        }

        if launcher.loops >= 24 {
            let _ = handle.stop();
        }

        if !engine.tick(&mut launcher)? {
            break;
        }
        sleep(Duration::from_millis(5));
    }

    println!("stopped after {} loops", launcher.loops);
    Ok(())
}

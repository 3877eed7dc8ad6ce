//! # leap_midi
//!
//! Plays a monophonic MIDI voice from LeapMotion hand tracking.
//!
//! ## Gesture → MIDI mapping
//!
//! | Hand | Gesture | Action |
//! |---|---|---|
//! | Right | Pinch (strength > 0.8) | Note on; pitch follows palm height |
//! | Right | Open hand | Note off |
//! | Right | Leaves view | Note off |
//! | Left | Palm height | Selects the octave of the right hand |
//!
//! Notes go out on a virtual MIDI port other software can connect to.
//!
//! ## Feature flags
//!
//! * (default) — frames are replayed from a JSON-lines recording.
//! * `leap` — frames are polled from a real LeapMotion controller via LeapC.

pub mod bridge;
pub mod config;
pub mod error;
pub mod hand;
pub mod mapper;
pub mod midi;
pub mod source;
pub mod status;

pub use bridge::Bridge;
pub use error::{Error, Result};
pub use hand::{Frame, HandObservation, Handedness};
pub use mapper::{GestureMapper, MapperState};
pub use midi::{MidiEvent, MidiSink, NoteKind};

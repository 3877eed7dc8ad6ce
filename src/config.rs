//! Mapping constants and MIDI output settings.

/// Virtual port name advertised to other MIDI software.
pub const DEFAULT_PORT_NAME: &str = "test";

/// Constants of the gesture-to-note mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingConfig {
    /// Right-hand pinch strictly above this sounds a note.
    pub pinch_threshold: f32,
    /// Palm height (mm) to raw pitch step factor.
    pub y_scale: f32,
    /// Semitones spanned by the full raw pitch range of the right hand.
    pub notes_per_octave: i32,
    /// Semitones between two left-hand octave steps.
    pub octave_size: i32,
    /// Note number at raw pitch 0 and octave 0.
    pub base_note: i32,
    pub initial_octave: i32,
    /// Left-hand palm height (mm) covering `octave_span_octaves` octaves.
    pub octave_span_mm: i32,
    pub octave_span_octaves: i32,
    pub note_on_velocity: u8,
    pub note_off_velocity: u8,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.8,
            y_scale: 0.3175,
            notes_per_octave: 12,
            octave_size: 12,
            base_note: 24,
            initial_octave: 1,
            octave_span_mm: 400,
            octave_span_octaves: 3,
            note_on_velocity: 127,
            note_off_velocity: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiConfig {
    pub port_name: String,
    /// Zero-based channel, 0..=15.
    pub channel: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            port_name: DEFAULT_PORT_NAME.to_string(),
            channel: 0,
        }
    }
}

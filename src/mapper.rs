//! The gesture mapper: right hand plays a monophonic lead voice, left hand
//! picks the octave.
//!
//! Within one frame the left hand is evaluated before the right hand, so an
//! octave change is heard on the very frame it happens. If a frame reports
//! several hands of the same side, the last one reported wins.

use tracing::debug;

use crate::config::MappingConfig;
use crate::hand::{Frame, HandObservation, Handedness};
use crate::midi::MidiEvent;

/// What the mapper remembers between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperState {
    pub octave: i32,
    /// Note currently sounding, if any. Never more than one.
    pub sounding: Option<u8>,
}

impl MapperState {
    pub fn new(initial_octave: i32) -> Self {
        Self {
            octave: initial_octave,
            sounding: None,
        }
    }
}

pub struct GestureMapper {
    config: MappingConfig,
    state: MapperState,
}

impl GestureMapper {
    pub fn new(config: MappingConfig) -> Self {
        let state = MapperState::new(config.initial_octave);
        Self { config, state }
    }

    pub fn state(&self) -> &MapperState {
        &self.state
    }

    /// Runs one tracking frame through the mapper and returns the MIDI
    /// messages to send, in order. At most a NoteOff/NoteOn pair.
    pub fn on_frame(&mut self, frame: &Frame) -> Vec<MidiEvent> {
        let mut events = Vec::with_capacity(2);

        if let Some(left) = frame.last(Handedness::Left) {
            self.update_octave(left);
        }
        self.update_lead(frame.last(Handedness::Right), &mut events);

        events
    }

    /// Left hand: palm height selects the octave. Truncates toward zero like
    /// a C cast, so heights strictly between -134 and 134 mm all give octave 1.
    pub fn update_octave(&mut self, left: &HandObservation) {
        let c = &self.config;
        let y = left.palm_y() as i32;
        let octave = c.octave_span_octaves.saturating_mul(y) / c.octave_span_mm + 1;

        if octave != self.state.octave {
            debug!(from = self.state.octave, to = octave, "octave change");
            self.state.octave = octave;
        }
    }

    /// Right hand: a pinch sounds the note for the palm height, releasing
    /// the pinch or losing the hand silences it.
    pub fn update_lead(&mut self, right: Option<&HandObservation>, events: &mut Vec<MidiEvent>) {
        match right {
            Some(hand) if hand.pinch > self.config.pinch_threshold => {
                let note = self.note_for(hand.palm_y(), self.state.octave);
                self.play(note, events);
            }
            _ => events.extend(self.silence()),
        }
    }

    /// Note for a right-hand palm height at the given octave, clamped to the
    /// MIDI range.
    pub fn note_for(&self, palm_y: f32, octave: i32) -> u8 {
        let c = &self.config;
        let raw = ((palm_y * c.y_scale) as i32).clamp(0, 127);
        let offset = c.base_note.saturating_add(octave.saturating_mul(c.octave_size));
        let note = (raw * c.notes_per_octave / 127).saturating_add(offset);
        note.clamp(0, 127) as u8
    }

    /// Stops the sounding note, if there is one.
    pub fn silence(&mut self) -> Option<MidiEvent> {
        self.state
            .sounding
            .take()
            .map(|note| MidiEvent::note_off(note, self.config.note_off_velocity))
    }

    fn play(&mut self, note: u8, events: &mut Vec<MidiEvent>) {
        if self.state.sounding == Some(note) {
            return;
        }
        events.extend(self.silence());
        events.push(MidiEvent::note_on(note, self.config.note_on_velocity));
        self.state.sounding = Some(note);
    }
}

impl Default for GestureMapper {
    fn default() -> Self {
        Self::new(MappingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::NoteKind;
    use proptest::prelude::*;

    fn frame(hands: Vec<HandObservation>) -> Frame {
        Frame::new(0, hands)
    }

    #[test]
    fn starts_silent_in_octave_one() {
        let mapper = GestureMapper::default();
        assert_eq!(mapper.state(), &MapperState { octave: 1, sounding: None });
    }

    #[test]
    fn pinch_sounds_note() {
        let mut mapper = GestureMapper::default();
        // 100 * 0.3175 -> 31, 31 * 12 / 127 -> 2, + 24 + 12
        let events = mapper.on_frame(&frame(vec![HandObservation::right(100.0, 0.9)]));
        assert_eq!(events, vec![MidiEvent::note_on(38, 127)]);
        assert_eq!(mapper.state().sounding, Some(38));
    }

    #[test]
    fn losing_right_hand_releases_note() {
        let mut mapper = GestureMapper::default();
        mapper.on_frame(&frame(vec![HandObservation::right(100.0, 0.9)]));

        let events = mapper.on_frame(&frame(vec![]));
        assert_eq!(events, vec![MidiEvent::note_off(38, 0)]);
        assert_eq!(mapper.state().sounding, None);

        assert!(mapper.on_frame(&frame(vec![])).is_empty());
    }

    #[test]
    fn left_hand_alone_keeps_note_released() {
        let mut mapper = GestureMapper::default();
        mapper.on_frame(&frame(vec![HandObservation::right(100.0, 0.9)]));

        let events = mapper.on_frame(&frame(vec![HandObservation::left(0.0)]));
        assert_eq!(events, vec![MidiEvent::note_off(38, 0)]);
    }

    #[test]
    fn releasing_pinch_releases_note() {
        let mut mapper = GestureMapper::default();
        mapper.on_frame(&frame(vec![HandObservation::right(100.0, 0.9)]));

        let events = mapper.on_frame(&frame(vec![HandObservation::right(100.0, 0.8)]));
        assert_eq!(events, vec![MidiEvent::note_off(38, 0)]);
        assert_eq!(mapper.state().sounding, None);
    }

    #[test]
    fn moving_hand_retriggers() {
        let mut mapper = GestureMapper::default();
        mapper.on_frame(&frame(vec![HandObservation::right(100.0, 0.9)]));

        // 300 * 0.3175 -> 95, 95 * 12 / 127 -> 8, + 36
        let events = mapper.on_frame(&frame(vec![HandObservation::right(300.0, 0.95)]));
        assert_eq!(
            events,
            vec![MidiEvent::note_off(38, 0), MidiEvent::note_on(44, 127)]
        );
        assert_eq!(mapper.state().sounding, Some(44));
    }

    #[test]
    fn left_hand_at_400_selects_octave_four() {
        let mut mapper = GestureMapper::default();
        mapper.on_frame(&frame(vec![HandObservation::left(400.0)]));
        assert_eq!(mapper.state().octave, 4);

        let events = mapper.on_frame(&frame(vec![HandObservation::right(0.0, 1.0)]));
        assert_eq!(events, vec![MidiEvent::note_on(72, 127)]);
    }

    #[test]
    fn octave_applies_within_same_frame() {
        let mut mapper = GestureMapper::default();
        // Right hand reported first; left still wins the ordering.
        let events = mapper.on_frame(&frame(vec![
            HandObservation::right(0.0, 1.0),
            HandObservation::left(400.0),
        ]));
        assert_eq!(events, vec![MidiEvent::note_on(72, 127)]);
    }

    #[test]
    fn missing_left_hand_keeps_octave() {
        let mut mapper = GestureMapper::default();
        mapper.on_frame(&frame(vec![HandObservation::left(800.0)]));
        mapper.on_frame(&frame(vec![]));
        assert_eq!(mapper.state().octave, 7);
    }

    #[test]
    fn octave_truncates_toward_zero() {
        let mut mapper = GestureMapper::default();
        mapper.on_frame(&frame(vec![HandObservation::left(-200.0)]));
        assert_eq!(mapper.state().octave, 0);

        mapper.on_frame(&frame(vec![HandObservation::left(-100.0)]));
        assert_eq!(mapper.state().octave, 1);

        mapper.on_frame(&frame(vec![HandObservation::left(-0.5)]));
        assert_eq!(mapper.state().octave, 1);
    }

    #[test]
    fn duplicate_right_hands_last_wins() {
        let mut mapper = GestureMapper::default();
        let events = mapper.on_frame(&frame(vec![
            HandObservation::right(300.0, 0.9),
            HandObservation::right(100.0, 0.9),
        ]));
        assert_eq!(events, vec![MidiEvent::note_on(38, 127)]);
    }

    #[test]
    fn duplicate_right_hand_released_last_silences() {
        let mut mapper = GestureMapper::default();
        let events = mapper.on_frame(&frame(vec![
            HandObservation::right(300.0, 0.9),
            HandObservation::right(100.0, 0.1),
        ]));
        assert!(events.is_empty());
        assert_eq!(mapper.state().sounding, None);
    }

    #[test]
    fn note_stays_within_midi_range() {
        let mapper = GestureMapper::default();
        assert_eq!(mapper.note_for(10_000.0, 20), 127);
        assert_eq!(mapper.note_for(-500.0, -10), 0);
        // Negative heights read as the bottom of the range.
        assert_eq!(mapper.note_for(-500.0, 1), 36);
    }

    #[test]
    fn octave_step_follows_config() {
        let mapper = GestureMapper::new(MappingConfig {
            octave_size: 7,
            ..MappingConfig::default()
        });
        assert_eq!(mapper.note_for(0.0, 0), 24);
        assert_eq!(mapper.note_for(0.0, 2), 38);
        // Pitch span of the right hand is independent of the octave step.
        assert_eq!(mapper.note_for(410.0, 0), 36);
    }

    #[test]
    fn top_of_range_spans_a_full_octave() {
        let mapper = GestureMapper::default();
        // Anything above 127 raw steps is the top of the octave.
        assert_eq!(mapper.note_for(410.0, 1), 48);
        assert_eq!(mapper.note_for(0.0, 1), 36);
    }

    proptest! {
        #[test]
        fn open_hand_never_leaves_a_note(
            y in -500.0f32..1000.0,
            p in 0.0f32..=0.8,
            playing in any::<bool>(),
        ) {
            let mut mapper = GestureMapper::default();
            if playing {
                mapper.on_frame(&frame(vec![HandObservation::right(200.0, 1.0)]));
            }

            let events = mapper.on_frame(&frame(vec![HandObservation::right(y, p)]));
            prop_assert_eq!(mapper.state().sounding, None);
            prop_assert_eq!(events.len(), usize::from(playing));
            prop_assert!(events.iter().all(|e| e.kind == NoteKind::NoteOff));
        }

        #[test]
        fn holding_still_is_silent(y in -100.0f32..600.0, p in 0.81f32..=1.0) {
            let mut mapper = GestureMapper::default();
            let first = mapper.on_frame(&frame(vec![HandObservation::right(y, p)]));
            prop_assert_eq!(first.len(), 1);

            let second = mapper.on_frame(&frame(vec![HandObservation::right(y, p)]));
            prop_assert!(second.is_empty());
        }

        #[test]
        fn octave_shift_moves_note_by_twelve(
            y in 0.0f32..400.0,
            from in 0i32..=7,
            to in 0i32..=7,
        ) {
            // Left-hand heights that land exactly on each octave.
            let left_y = |octave: i32| match octave {
                0 => -134.0,
                o => ((o - 1) * 400 / 3 + 1) as f32,
            };

            let mut mapper = GestureMapper::default();
            mapper.on_frame(&frame(vec![HandObservation::left(left_y(from))]));
            prop_assert_eq!(mapper.state().octave, from);
            let before = mapper.on_frame(&frame(vec![HandObservation::right(y, 1.0)]));

            mapper.on_frame(&frame(vec![]));
            mapper.on_frame(&frame(vec![HandObservation::left(left_y(to))]));
            prop_assert_eq!(mapper.state().octave, to);
            let after = mapper.on_frame(&frame(vec![HandObservation::right(y, 1.0)]));

            let shift = after[0].note as i32 - before[0].note as i32;
            prop_assert_eq!(shift, 12 * (to - from));
        }
    }
}

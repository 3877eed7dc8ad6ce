//! Glue between a frame source, the gesture mapper and a MIDI sink.

use std::io::Stdout;

use tracing::{info, trace, warn};

use crate::hand::Frame;
use crate::mapper::{GestureMapper, MapperState};
use crate::midi::{MidiEvent, MidiSink, NoteKind, note_name};
use crate::status::StatusPanel;

pub struct Bridge<S: MidiSink> {
    mapper: GestureMapper,
    sink: S,
    status: Option<StatusPanel<Stdout>>,
    frames: u64,
}

impl<S: MidiSink> Bridge<S> {
    pub fn new(mapper: GestureMapper, sink: S) -> Self {
        Self {
            mapper,
            sink,
            status: None,
            frames: 0,
        }
    }

    pub fn with_status(mut self, panel: StatusPanel<Stdout>) -> Self {
        self.status = Some(panel);
        self
    }

    pub fn state(&self) -> &MapperState {
        self.mapper.state()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Maps one frame and forwards the resulting messages to the sink.
    /// Send failures are logged; the mapper state has already moved on.
    pub fn handle_frame(&mut self, frame: &Frame) -> Vec<MidiEvent> {
        self.frames += 1;
        trace!(id = frame.id, hands = frame.hands.len(), "frame");

        let events = self.mapper.on_frame(frame);
        self.forward(&events);
        if !events.is_empty() {
            self.redraw();
        }
        events
    }

    /// Releases whatever is still sounding. Called when the source ends.
    pub fn finish(&mut self) -> Option<MidiEvent> {
        let event = self.mapper.silence();
        if let Some(event) = event {
            self.forward(&[event]);
            self.redraw();
        }
        info!(frames = self.frames, "bridge stopped");
        event
    }

    fn forward(&mut self, events: &[MidiEvent]) {
        for event in events {
            match event.kind {
                NoteKind::NoteOn => info!(
                    note = event.note,
                    name = %note_name(event.note).unwrap_or_default(),
                    octave = self.mapper.state().octave,
                    "note on"
                ),
                NoteKind::NoteOff => info!(note = event.note, "note off"),
            }
            if let Err(e) = self.sink.send(event) {
                warn!(error = %e, ?event, "MIDI send failed");
            }
        }
    }

    fn redraw(&mut self) {
        if let Some(panel) = self.status.as_mut() {
            if let Err(e) = panel.draw(self.frames, self.mapper.state()) {
                warn!(error = %e, "status panel redraw failed");
            }
        }
    }
}

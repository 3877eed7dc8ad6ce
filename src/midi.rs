//! MIDI note events and the sinks they are sent to.

use midir::{MidiOutput, MidiOutputConnection};
use tracing::{debug, info};

use crate::config::MidiConfig;
use crate::error::{Error, Result};

const NOTE_OFF_STATUS: u8 = 0x80;
const NOTE_ON_STATUS: u8 = 0x90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    NoteOn,
    NoteOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub kind: NoteKind,
    pub note: u8,
    pub velocity: u8,
}

impl MidiEvent {
    pub fn note_on(note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteKind::NoteOn,
            note,
            velocity,
        }
    }

    pub fn note_off(note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteKind::NoteOff,
            note,
            velocity,
        }
    }

    /// Three-byte channel-voice message on a zero-based channel.
    pub fn to_bytes(&self, channel: u8) -> [u8; 3] {
        let status = match self.kind {
            NoteKind::NoteOn => NOTE_ON_STATUS,
            NoteKind::NoteOff => NOTE_OFF_STATUS,
        };
        [status | (channel & 0x0F), self.note & 0x7F, self.velocity & 0x7F]
    }
}

/// Anything that can play note messages.
pub trait MidiSink {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<()>;
    fn note_off(&mut self, note: u8, velocity: u8) -> Result<()>;

    fn send(&mut self, event: &MidiEvent) -> Result<()> {
        match event.kind {
            NoteKind::NoteOn => self.note_on(event.note, event.velocity),
            NoteKind::NoteOff => self.note_off(event.note, event.velocity),
        }
    }
}

impl<S: MidiSink + ?Sized> MidiSink for Box<S> {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        (**self).note_on(note, velocity)
    }

    fn note_off(&mut self, note: u8, velocity: u8) -> Result<()> {
        (**self).note_off(note, velocity)
    }
}

/// Sink backed by a midir output connection.
pub struct MidirSink {
    conn: MidiOutputConnection,
    channel: u8,
}

impl MidirSink {
    /// Opens the output once at startup. On Unix this creates a virtual port
    /// under `port_name`; elsewhere it connects to the first existing output
    /// whose name contains `port_name`, or the first output at all.
    pub fn open(config: &MidiConfig) -> Result<Self> {
        let midi_out = MidiOutput::new(&config.port_name)?;
        let conn = Self::connect(midi_out, &config.port_name)?;
        Ok(Self {
            conn,
            channel: config.channel & 0x0F,
        })
    }

    #[cfg(unix)]
    fn connect(midi_out: MidiOutput, port_name: &str) -> Result<MidiOutputConnection> {
        use midir::os::unix::VirtualOutput;

        info!(port = port_name, "creating virtual MIDI output");
        midi_out
            .create_virtual(port_name)
            .map_err(|e| Error::MidiConnect {
                port: port_name.to_string(),
                reason: e.to_string(),
            })
    }

    #[cfg(not(unix))]
    fn connect(midi_out: MidiOutput, port_name: &str) -> Result<MidiOutputConnection> {
        let ports = midi_out.ports();
        if ports.is_empty() {
            return Err(Error::NoOutputPort);
        }

        let wanted = port_name.to_lowercase();
        let port = ports
            .iter()
            .find(|p| {
                midi_out
                    .port_name(p)
                    .map(|n| n.to_lowercase().contains(&wanted))
                    .unwrap_or(false)
            })
            .unwrap_or(&ports[0]);
        let name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());
        info!(port = %name, "opening MIDI output");

        midi_out
            .connect(port, port_name)
            .map_err(|e| Error::MidiConnect {
                port: name,
                reason: e.to_string(),
            })
    }

    fn send_bytes(&mut self, event: MidiEvent) -> Result<()> {
        self.conn.send(&event.to_bytes(self.channel))?;
        Ok(())
    }
}

impl MidiSink for MidirSink {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        self.send_bytes(MidiEvent::note_on(note, velocity))
    }

    fn note_off(&mut self, note: u8, velocity: u8) -> Result<()> {
        self.send_bytes(MidiEvent::note_off(note, velocity))
    }
}

/// Drops every message. Used with `--no-midi`.
pub struct NullSink;

impl MidiSink for NullSink {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        debug!(note, velocity, "note on (no output)");
        Ok(())
    }

    fn note_off(&mut self, note: u8, velocity: u8) -> Result<()> {
        debug!(note, velocity, "note off (no output)");
        Ok(())
    }
}

/// Scientific pitch name of a MIDI note, e.g. 60 -> "C4".
pub fn note_name(note: u8) -> Option<String> {
    const NOTE_NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];

    if note > 127 {
        return None;
    }
    let octave = (note / 12) as i32 - 1;
    Some(format!("{}{}", NOTE_NAMES[(note % 12) as usize], octave))
}

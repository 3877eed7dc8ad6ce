//! Live terminal panel showing what the mapper is doing.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use crate::mapper::MapperState;
use crate::midi::note_name;

/// Stream the log output should go to. The panel clears stdout on every
/// redraw, so logs move to stderr while it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    Stderr,
}

impl LogTarget {
    pub fn for_panel(panel_enabled: bool) -> Self {
        if panel_enabled { Self::Stderr } else { Self::Stdout }
    }
}

pub struct StatusPanel<W: Write> {
    out: W,
    port_name: String,
}

impl StatusPanel<Stdout> {
    pub fn stdout(port_name: &str) -> Self {
        Self::new(io::stdout(), port_name)
    }
}

impl<W: Write> StatusPanel<W> {
    pub fn new(out: W, port_name: &str) -> Self {
        Self {
            out,
            port_name: port_name.to_string(),
        }
    }

    /// Clears the terminal and redraws the panel.
    pub fn draw(&mut self, frames: u64, state: &MapperState) -> io::Result<()> {
        execute!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;

        let (note, name) = match state.sounding {
            Some(n) => (n.to_string(), note_name(n).unwrap_or_default()),
            None => ("-".to_string(), "-".to_string()),
        };
        write!(
            self.out,
            "
MIDI port = {}

Octave = {}
Midi note = {}, {}

Frames = {}
",
            self.port_name, state.octave, note, name, frames,
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

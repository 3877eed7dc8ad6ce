use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("MIDI init error: {0}")]
    MidiInit(#[from] midir::InitError),

    #[error("could not open MIDI output {port:?}: {reason}")]
    MidiConnect { port: String, reason: String },

    #[error("no MIDI output ports available")]
    NoOutputPort,

    #[error("MIDI send failed: {0}")]
    MidiSend(#[from] midir::SendError),

    /// LeapC connection could not be created or opened.
    #[error("tracking connection error: {0}")]
    Tracking(String),

    #[error("replay line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("replay line {line}: {source}")]
    ReplayIo {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

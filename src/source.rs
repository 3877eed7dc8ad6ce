//! Where tracking frames come from.
//!
//! Consumers don't need to know whether frames came from real hardware or a
//! recording; both implement [`FrameSource`].

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{Level, debug, error, info, trace, warn};

use crate::error::{Error, Result};
use crate::hand::Frame;

/// Anything that can deliver tracking frames, one at a time, in order.
pub trait FrameSource {
    /// Calls `on_frame` for every frame until the source runs dry.
    fn run(self: Box<Self>, on_frame: &mut dyn FnMut(&Frame)) -> Result<()>;
}

// ── Recorded frames ────────────────────────────────────────

/// Replays frames recorded as JSON lines, one [`Frame`] per line.
/// Blank lines and lines starting with `#` are skipped.
pub struct ReplaySource<R> {
    reader: R,
    interval: Option<Duration>,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            interval: None,
        }
    }

    /// Sleep this long after each frame, to play a recording back in real time.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

impl ReplaySource<Box<dyn BufRead>> {
    /// Opens a recording; `-` reads from stdin.
    pub fn open(path: &Path) -> Result<Self> {
        let reader: Box<dyn BufRead> = if path == Path::new("-") {
            Box::new(BufReader::new(io::stdin()))
        } else {
            Box::new(BufReader::new(File::open(path)?))
        };
        info!(path = %path.display(), "replaying recorded frames");
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    fn run(self: Box<Self>, on_frame: &mut dyn FnMut(&Frame)) -> Result<()> {
        let ReplaySource { reader, interval } = *self;
        let mut count = 0u64;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| Error::ReplayIo {
                line: index + 1,
                source,
            })?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let frame: Frame = serde_json::from_str(line).map_err(|source| Error::Replay {
                line: index + 1,
                source,
            })?;
            on_frame(&frame);
            count += 1;

            if let Some(interval) = interval {
                thread::sleep(interval);
            }
        }

        debug!(frames = count, "end of recording");
        Ok(())
    }
}

// ── LeapC diagnostics ──────────────────────────────────────

/// Severity attached to a LeapC log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkSeverity {
    Critical,
    Warning,
    Information,
    Unknown,
}

impl SdkSeverity {
    pub fn level(self) -> Level {
        match self {
            Self::Critical => Level::ERROR,
            Self::Warning => Level::WARN,
            Self::Information => Level::INFO,
            Self::Unknown => Level::DEBUG,
        }
    }
}

/// Re-emits a LeapC log message through `tracing`. Connection and allocator
/// trouble inside the SDK is only ever reported this way.
pub fn log_sdk_message(severity: SdkSeverity, timestamp: i64, message: &str) {
    match severity {
        SdkSeverity::Critical => error!(timestamp, "LeapC: {message}"),
        SdkSeverity::Warning => warn!(timestamp, "LeapC: {message}"),
        SdkSeverity::Information => info!(timestamp, "LeapC: {message}"),
        SdkSeverity::Unknown => debug!(timestamp, "LeapC: {message}"),
    }
}

/// Level for a failed poll, given the error's debug rendering. A timeout just
/// means nothing happened during the poll window; anything else is reported.
pub fn poll_error_level(error: &str) -> Level {
    if error.contains("Timeout") {
        Level::TRACE
    } else {
        Level::WARN
    }
}

pub fn log_poll_error(error: &str) {
    if poll_error_level(error) == Level::TRACE {
        trace!(error, "poll timed out");
    } else {
        warn!(error, "poll failed");
    }
}

// ── LeapMotion hardware (feature = "leap") ─────────────────

/// Frames from a real LeapMotion controller via LeapC.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Connection, device and SDK log events are only logged; tracking events
/// become [`Frame`]s. Never returns once the connection is open.
#[cfg(feature = "leap")]
pub struct LeapSource {
    pub poll_timeout_ms: u32,
}

#[cfg(feature = "leap")]
impl Default for LeapSource {
    fn default() -> Self {
        Self {
            poll_timeout_ms: 1000,
        }
    }
}

#[cfg(feature = "leap")]
impl FrameSource for LeapSource {
    fn run(self: Box<Self>, on_frame: &mut dyn FnMut(&Frame)) -> Result<()> {
        use crate::hand::{HandObservation, Handedness};
        use leaprs::{Connection, ConnectionConfig, Event, HandType, LogSeverity};

        let forward_log = |severity: LogSeverity, timestamp: i64, message: &str| {
            let severity = match severity {
                LogSeverity::Critical => SdkSeverity::Critical,
                LogSeverity::Warning => SdkSeverity::Warning,
                LogSeverity::Information => SdkSeverity::Information,
                _ => SdkSeverity::Unknown,
            };
            log_sdk_message(severity, timestamp, message);
        };

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| Error::Tracking(format!("create: {e:?}")))?;
        connection
            .open()
            .map_err(|e| Error::Tracking(format!("open: {e:?}")))?;
        info!("LeapC connection opened");

        let mut next_id = 0u64;
        loop {
            let message = match connection.poll(self.poll_timeout_ms) {
                Ok(m) => m,
                Err(e) => {
                    log_poll_error(&format!("{e:?}"));
                    continue;
                }
            };

            match message.event() {
                Event::Connection(_) => info!("connected"),
                Event::Device(_) => info!("found device"),
                Event::ConnectionLost(_) => warn!("connection to the tracking service lost"),
                Event::DeviceLost(_) => warn!("tracking device lost"),
                Event::DeviceFailure(_) => warn!("tracking device failure"),
                Event::LogEvent(e) => forward_log(e.severity(), e.timestamp(), &e.message()),
                Event::LogEvents(events) => {
                    for e in events.events() {
                        forward_log(e.severity(), e.timestamp(), &e.message());
                    }
                }
                Event::Tracking(data) => {
                    let hands = data
                        .hands()
                        .iter()
                        .map(|hand| {
                            let position = hand.palm().position();
                            let handedness = if hand.hand_type() == HandType::Right {
                                Handedness::Right
                            } else {
                                Handedness::Left
                            };
                            HandObservation::new(
                                handedness,
                                [position.x(), position.y(), position.z()],
                                hand.pinch_strength(),
                            )
                        })
                        .collect();

                    on_frame(&Frame::new(next_id, hands));
                    next_id += 1;
                }
                _ => {}
            }
        }
    }
}

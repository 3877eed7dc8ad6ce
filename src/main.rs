use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use leap_midi::config::{DEFAULT_PORT_NAME, MappingConfig, MidiConfig};
use leap_midi::midi::{MidiSink, MidirSink, NullSink};
use leap_midi::source::{FrameSource, ReplaySource};
use leap_midi::status::{LogTarget, StatusPanel};
use leap_midi::{Bridge, Frame, GestureMapper};

#[derive(Parser, Debug)]
#[command(name = "leap-midi", about = "Play MIDI notes with LeapMotion hand gestures")]
struct Cli {
    /// Name of the virtual MIDI output port
    #[arg(long, default_value = DEFAULT_PORT_NAME)]
    port_name: String,

    /// MIDI channel, 1-16
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=16))]
    channel: u8,

    /// Right-hand pinch strength above which a note sounds
    #[arg(long, default_value_t = 0.8)]
    pinch_threshold: f32,

    /// Replay recorded frames (JSON lines) instead of polling the device; `-` for stdin
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Delay between replayed frames, in milliseconds
    #[arg(long, requires = "replay")]
    replay_interval_ms: Option<u64>,

    /// Log notes without opening a MIDI port
    #[arg(long)]
    no_midi: bool,

    /// Redraw a status panel in the terminal on every note change
    #[arg(long)]
    status: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logs = tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "leap_midi=info".into()),
    );
    match LogTarget::for_panel(cli.status) {
        LogTarget::Stderr => logs.with_writer(std::io::stderr).init(),
        LogTarget::Stdout => logs.init(),
    }

    info!("leap-midi v{} starting", env!("CARGO_PKG_VERSION"));

    let midi_config = MidiConfig {
        port_name: cli.port_name.clone(),
        channel: cli.channel - 1,
    };
    let mapping = MappingConfig {
        pinch_threshold: cli.pinch_threshold,
        ..MappingConfig::default()
    };

    let source = frame_source(&cli)?;

    if cli.no_midi {
        run(&cli, mapping, NullSink, source)
    } else {
        let sink = MidirSink::open(&midi_config)
            .with_context(|| format!("opening MIDI output {:?}", midi_config.port_name))?;
        run(&cli, mapping, sink, source)
    }
}

fn frame_source(cli: &Cli) -> Result<Box<dyn FrameSource>> {
    if let Some(path) = &cli.replay {
        let mut replay = ReplaySource::open(path)
            .with_context(|| format!("opening recording {}", path.display()))?;
        if let Some(ms) = cli.replay_interval_ms {
            replay = replay.with_interval(Duration::from_millis(ms));
        }
        return Ok(Box::new(replay));
    }

    hardware_source()
}

#[cfg(feature = "leap")]
fn hardware_source() -> Result<Box<dyn FrameSource>> {
    info!("tracking source: LeapMotion");
    Ok(Box::new(leap_midi::source::LeapSource::default()))
}

#[cfg(not(feature = "leap"))]
fn hardware_source() -> Result<Box<dyn FrameSource>> {
    anyhow::bail!("no frame source: pass --replay <file>, or build with `--features leap` for hardware")
}

fn run<S: MidiSink>(
    cli: &Cli,
    mapping: MappingConfig,
    sink: S,
    source: Box<dyn FrameSource>,
) -> Result<()> {
    let mut bridge = Bridge::new(GestureMapper::new(mapping), sink);
    if cli.status {
        bridge = bridge.with_status(StatusPanel::stdout(&cli.port_name));
    }

    let result = source.run(&mut |frame: &Frame| {
        bridge.handle_frame(frame);
    });
    bridge.finish();

    result.context("frame source failed")
}

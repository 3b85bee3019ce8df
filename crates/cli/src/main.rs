//! Headless driver for the caption engine.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use caption_engine::{
    Command, Engine, Event, MemoryStyleHost, PresetKind, PresetRegistry, STYLESHEET_ID,
    TextMetrics,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Evaluate caption animations from a video configuration document.
#[derive(Parser, Debug)]
#[command(name = "captions", version)]
struct Args {
    /// Video configuration document (JSON).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Measured text box width in pixels, used for relative offsets.
    #[arg(long, global = true)]
    text_width: Option<f64>,

    /// Measured text box height in pixels, used for relative offsets.
    #[arg(long, global = true)]
    text_height: Option<f64>,

    /// Log filter, e.g. `debug` or `caption_engine=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the frame at one instant as JSON.
    Frame {
        /// Playback time in seconds.
        #[arg(short, long)]
        time: f64,
    },
    /// Print one JSON line per sampled instant.
    Scan {
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        /// End time in seconds; defaults to the document duration.
        #[arg(long)]
        to: Option<f64>,
        #[arg(long, default_value_t = 0.1)]
        step: f64,
    },
    /// List built-in animation presets.
    Presets {
        /// Only list one kind: entry, exit, highlight or video.
        #[arg(long)]
        kind: Option<PresetKind>,
    },
    /// Print the highlight keyframes stylesheet.
    Keyframes,
    /// Load and validate the document, then print its summary.
    Validate,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    match &args.command {
        Cmd::Presets { kind } => print_presets(*kind),
        Cmd::Keyframes => print_keyframes(),
        Cmd::Frame { time } => {
            let mut engine = load_engine(&args)?;
            let events = engine.handle_command(Command::SetPlayhead { t: *time })?;
            let frame = frame_event(&events).context("engine emitted no frame")?;
            println!("{}", serde_json::to_string_pretty(frame)?);
            Ok(())
        }
        Cmd::Scan { from, to, step } => {
            let mut engine = load_engine(&args)?;
            let to = match to {
                Some(to) => *to,
                None => engine
                    .config()
                    .map(|config| config.duration())
                    .context("configuration missing after load")?,
            };
            scan(&mut engine, *from, to, *step)
        }
        Cmd::Validate => {
            let engine = load_engine(&args)?;
            let summary = engine
                .config()
                .map(|config| config.summary())
                .context("configuration missing after load")?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    Ok(())
}

fn load_engine(args: &Args) -> anyhow::Result<Engine<MemoryStyleHost>> {
    let path = args
        .config
        .clone()
        .context("--config <path> is required for this command")?;
    let mut engine = Engine::new(MemoryStyleHost::new());
    engine
        .handle_command(Command::LoadConfig { path: path.clone() })
        .with_context(|| format!("failed to load {}", path.display()))?;
    info!(path = %path.display(), "configuration ready");

    if args.text_width.is_some() || args.text_height.is_some() {
        let metrics = TextMetrics {
            width: args.text_width.unwrap_or(TextMetrics::APPROXIMATE.width),
            height: args.text_height.unwrap_or(TextMetrics::APPROXIMATE.height),
        };
        engine.handle_command(Command::SetTextMetrics(metrics))?;
    }
    Ok(engine)
}

fn frame_event(events: &[Event]) -> Option<&Event> {
    events
        .iter()
        .find(|event| matches!(event, Event::FrameReady { .. }))
}

fn scan(engine: &mut Engine<MemoryStyleHost>, from: f64, to: f64, step: f64) -> anyhow::Result<()> {
    if !step.is_finite() || step <= 0.0 {
        bail!("--step must be a positive number of seconds, got {step}");
    }
    if to < from {
        bail!("--to ({to}) must not be before --from ({from})");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let samples = ((to - from) / step).floor() as u64;
    for index in 0..=samples {
        let t = from + index as f64 * step;
        let events = engine.handle_command(Command::SetPlayhead { t })?;
        if let Some(frame) = frame_event(&events) {
            serde_json::to_writer(&mut out, frame)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn print_presets(kind: Option<PresetKind>) -> anyhow::Result<()> {
    let registry = PresetRegistry::builtin();
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => PresetKind::ALL.to_vec(),
    };

    let listing: Vec<_> = kinds
        .into_iter()
        .flat_map(|kind| registry.presets(kind))
        .map(|preset| {
            json!({
                "kind": preset.preset.kind,
                "id": preset.id(),
                "duration": preset.duration(),
                "easing": preset.easing(),
                "oscillating": preset.is_oscillating(),
                "properties": preset.properties(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

fn print_keyframes() -> anyhow::Result<()> {
    let mut engine = Engine::new(MemoryStyleHost::new());
    engine.handle_command(Command::InstallHighlightKeyframes)?;
    let css = engine
        .host()
        .stylesheet(STYLESHEET_ID)
        .context("keyframes stylesheet was not registered")?;
    print!("{css}");
    Ok(())
}

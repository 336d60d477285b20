//! Headless driver for the editor core.
//!
//! Replays a JSON edit script against a set of asset records and prints the
//! resulting timeline, or plays it back through a recording renderer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cutline::config::EditorConfig;
use cutline::core::asset::{Asset, AssetCatalog};
use cutline::core::time::{format_time, Millis};
use cutline::core::timeline::TimelineState;
use cutline::core::validate::validate;
use cutline::edit::EditCommand;
use cutline::export::ExportRequest;
use cutline::media::MediaMetadata;
use cutline::playback::{PlaybackSession, PlaybackSnapshot, RecordingRenderer};

#[derive(Parser, Debug)]
#[command(name = "cutline")]
#[command(version)]
#[command(about = "Non-destructive timeline editing from the command line")]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay an edit script and print the resulting timeline
    Apply {
        #[command(flatten)]
        inputs: Inputs,

        /// Also plan an export to this file and print the request
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay an edit script, then play the timeline from its playhead
    Simulate {
        #[command(flatten)]
        inputs: Inputs,

        /// Renderer clock step in milliseconds
        #[arg(long, default_value_t = 40)]
        tick: Millis,

        /// Stop after this many renderer ticks
        #[arg(long, default_value_t = 100_000)]
        max_ticks: usize,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Asset records: `[{"path": ..., "durationMs": ..., "width": ..., "height": ...}]`
    #[arg(long)]
    assets: PathBuf,

    /// Edit script: a JSON array of steps
    #[arg(long)]
    script: PathBuf,
}

/// One probed media file as listed in the assets file
#[derive(Debug, Deserialize)]
struct AssetRecord {
    path: PathBuf,
    #[serde(flatten)]
    metadata: MediaMetadata,
}

/// A script step. Clips are addressed by their index on the track at the
/// time the step runs.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum ScriptStep {
    #[serde(rename_all = "camelCase")]
    Place { asset_path: PathBuf },
    #[serde(rename_all = "camelCase")]
    TrimIn { clip: usize, in_ms: Millis },
    #[serde(rename_all = "camelCase")]
    TrimOut { clip: usize, out_ms: Millis },
    Delete { clip: usize },
    #[serde(rename_all = "camelCase")]
    SetPlayhead { position_ms: Millis },
}

impl ScriptStep {
    /// Resolve track indices against `state`
    fn to_command(&self, state: &TimelineState) -> Option<EditCommand> {
        let clip_id = |index: usize| state.clips().get(index).map(|c| c.id);
        match self {
            ScriptStep::Place { asset_path } => Some(EditCommand::Place {
                asset_path: asset_path.clone(),
            }),
            ScriptStep::TrimIn { clip, in_ms } => clip_id(*clip).map(|clip| EditCommand::TrimIn {
                clip,
                in_ms: *in_ms,
            }),
            ScriptStep::TrimOut { clip, out_ms } => clip_id(*clip).map(|clip| EditCommand::TrimOut {
                clip,
                out_ms: *out_ms,
            }),
            ScriptStep::Delete { clip } => clip_id(*clip).map(|clip| EditCommand::Delete { clip }),
            ScriptStep::SetPlayhead { position_ms } => Some(EditCommand::SetPlayhead {
                position_ms: *position_ms,
            }),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Command::Apply { inputs, output } => {
            let timeline = replay(&inputs)?;
            println!("{}", serde_json::to_string_pretty(&timeline)?);
            report_violations(&timeline);

            if let Some(output) = output {
                let request = ExportRequest::from_timeline(&timeline, output, &config.export)?;
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
        }
        Command::Simulate { inputs, tick, max_ticks } => {
            if tick <= 0 {
                bail!("--tick must be positive, got {tick}");
            }
            let timeline = replay(&inputs)?;
            simulate(timeline, tick, max_ticks)?;
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn replay(inputs: &Inputs) -> anyhow::Result<TimelineState> {
    let records: Vec<AssetRecord> = read_json(&inputs.assets)?;
    let mut catalog = AssetCatalog::new();
    for record in records {
        if !catalog.insert(Asset::from_metadata(record.path.clone(), &record.metadata)) {
            warn!(path = %record.path.display(), "duplicate asset record ignored");
        }
    }

    let steps: Vec<ScriptStep> = read_json(&inputs.script)?;
    let mut timeline = TimelineState::new();
    for (n, step) in steps.iter().enumerate() {
        match step.to_command(&timeline) {
            Some(command) => {
                let next = command.apply(&timeline, &catalog);
                if next == timeline {
                    info!(step = n, ?step, "step had no effect");
                }
                timeline = next;
            }
            None => warn!(step = n, ?step, "step skipped: no clip at that index"),
        }
    }
    Ok(timeline)
}

fn report_violations(timeline: &TimelineState) {
    let violations = validate(timeline);
    if violations.is_empty() {
        println!(
            "timeline valid: {} clip(s), {}",
            timeline.clips().len(),
            format_time(timeline.duration())
        );
    } else {
        for violation in &violations {
            println!("violation: {violation}");
        }
    }
}

fn simulate(timeline: TimelineState, tick: Millis, max_ticks: usize) -> anyhow::Result<()> {
    let (mut session, handle) = PlaybackSession::new(timeline, RecordingRenderer::new());
    let mut last = handle.snapshot();
    print_snapshot(&last);

    handle.play()?;
    for _ in 0..max_ticks {
        session.pump();
        let current = handle.snapshot();
        if is_transition(&last, &current) {
            print_snapshot(&current);
        }
        last = current;

        let Some(event) = session.controller_mut().renderer_mut().tick(tick) else {
            break;
        };
        handle.send(event)?;
    }

    info!(playhead = %format_time(last.playhead_ms), "simulation finished");
    Ok(())
}

/// Playing/paused/idle changed, or a different clip became active
fn is_transition(before: &PlaybackSnapshot, after: &PlaybackSnapshot) -> bool {
    state_name(before) != state_name(after) || before.state.clip_id() != after.state.clip_id()
}

fn print_snapshot(snapshot: &PlaybackSnapshot) {
    match (snapshot.state.clip_id(), snapshot.state.local_ms()) {
        (Some(clip), Some(local_ms)) => println!(
            "{} {:<7} clip {} @ {}",
            format_time(snapshot.playhead_ms),
            state_name(snapshot),
            clip,
            format_time(local_ms)
        ),
        _ => println!("{} {}", format_time(snapshot.playhead_ms), state_name(snapshot)),
    }
}

fn state_name(snapshot: &PlaybackSnapshot) -> &'static str {
    if snapshot.state.is_playing() {
        "playing"
    } else if snapshot.state.is_paused() {
        "paused"
    } else {
        "idle"
    }
}

use std::{fs, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::protocol::{parse_script, GestureScript, ScriptFormat};
use tracing_subscriber::EnvFilter;
use transition_core::{
    spring::{DEFAULT_DAMPING_FRACTION, DEFAULT_RESPONSE_SECS},
    EndOutcome, EventOutcome, ManualClock, PresentedFrame, SpringCurve, TransitionController,
    TransitionState,
};

const MAX_SPRING_SAMPLES: usize = 1000;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "warn")]
    log: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed a gesture script (.json or .toml) through the controller.
    Replay {
        path: PathBuf,
        /// Emit one JSON object per step instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Sample a settle curve.
    Spring {
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        from: f64,
        #[arg(long, default_value_t = transition_core::COLLAPSED_PREVIEW_OFFSET, allow_hyphen_values = true)]
        to: f64,
        #[arg(long, default_value_t = 16)]
        step_ms: u64,
        #[arg(long, default_value_t = DEFAULT_RESPONSE_SECS)]
        response: f64,
        #[arg(long, default_value_t = DEFAULT_DAMPING_FRACTION)]
        damping: f64,
    },
}

#[derive(Debug, Serialize)]
struct ReplayStep {
    at_ms: u64,
    event: &'static str,
    outcome: &'static str,
    state: TransitionState,
    frame: PresentedFrame,
}

fn describe(outcome: &EventOutcome) -> &'static str {
    match outcome {
        EventOutcome::Drag(drag) => drag.label(),
        EventOutcome::End(EndOutcome::Committed(_)) => "committed",
        EventOutcome::End(EndOutcome::SnappedBack(_)) => "snapped_back",
        EventOutcome::Cancel(Some(_)) => "cancelled",
        EventOutcome::Cancel(None) => "ignored",
        EventOutcome::Toggle(_) => "toggled",
    }
}

/// Runs the script on a manual clock and appends one settled step at the end.
fn replay(script: &GestureScript) -> Vec<ReplayStep> {
    let clock = ManualClock::shared();
    let mut controller = TransitionController::with_clock(Arc::clone(&clock));
    let mut steps = Vec::with_capacity(script.events.len() + 1);

    for scripted in &script.events {
        clock.set(Duration::from_millis(scripted.at_ms));
        let outcome = controller.apply(scripted.event);
        steps.push(ReplayStep {
            at_ms: scripted.at_ms,
            event: scripted.event.name(),
            outcome: describe(&outcome),
            state: controller.current_state(),
            frame: controller.presentation(),
        });
    }

    let last_ms = script.events.last().map_or(0, |e| e.at_ms);
    let settle = controller.curve().settle_duration();
    let settled_at = Duration::from_millis(last_ms) + settle + Duration::from_millis(1);
    clock.set(settled_at);
    steps.push(ReplayStep {
        at_ms: u64::try_from(settled_at.as_millis()).unwrap_or(u64::MAX),
        event: "settled",
        outcome: "rest",
        state: controller.current_state(),
        frame: controller.presentation(),
    });
    steps
}

#[derive(Debug, PartialEq)]
struct SpringSample {
    elapsed: Duration,
    value: f64,
    progress: f64,
}

/// Samples every `step` until the curve settles, at most
/// [`MAX_SPRING_SAMPLES`] times. The flag reports whether the cap cut it short.
fn sample_curve(
    curve: SpringCurve,
    from: f64,
    to: f64,
    step: Duration,
) -> (Vec<SpringSample>, bool) {
    let settle = curve.settle_duration();
    let mut samples = Vec::new();
    let mut elapsed = Duration::ZERO;
    while samples.len() < MAX_SPRING_SAMPLES {
        samples.push(SpringSample {
            elapsed,
            value: curve.value_at(from, to, elapsed),
            progress: curve.progress_at(elapsed),
        });
        if elapsed >= settle {
            return (samples, false);
        }
        elapsed = elapsed.saturating_add(step);
    }
    (samples, true)
}

fn load_script(path: &PathBuf) -> Result<GestureScript> {
    let Some(format) = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ScriptFormat::from_extension)
    else {
        bail!(
            "cannot tell script format of '{}'; use .json or .toml",
            path.display()
        );
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read gesture script '{}'", path.display()))?;
    parse_script(&raw, format)
        .with_context(|| format!("invalid gesture script '{}'", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Replay { path, json } => {
            let script = load_script(&path)?;
            for step in replay(&script) {
                if json {
                    println!("{}", serde_json::to_string(&step)?);
                } else {
                    println!(
                        "{:>6}ms  {:<9} {:<12} mode={:<7} offset={:>8.1} presented={:>8.1}",
                        step.at_ms,
                        step.event,
                        step.outcome,
                        step.state.mode.label(),
                        step.state.offset_y,
                        step.frame.offset_y,
                    );
                }
            }
        }
        Command::Spring {
            from,
            to,
            step_ms,
            response,
            damping,
        } => {
            if step_ms == 0 {
                bail!("--step-ms must be positive");
            }
            let curve = SpringCurve::new(response, damping);
            let settle = curve.settle_duration();
            println!(
                "response={:.3}s damping={:.3} settles in {}ms",
                curve.response(),
                curve.damping_fraction(),
                settle.as_millis()
            );
            let (samples, truncated) =
                sample_curve(curve, from, to, Duration::from_millis(step_ms));
            for sample in &samples {
                println!(
                    "{:>6}ms  value={:>9.2}  progress={:.3}",
                    sample.elapsed.as_millis(),
                    sample.value,
                    sample.progress
                );
            }
            if truncated {
                tracing::warn!(
                    samples = MAX_SPRING_SAMPLES,
                    "sample limit reached before the curve settled; raise --step-ms"
                );
            }
        }
    }

    Ok(())
}

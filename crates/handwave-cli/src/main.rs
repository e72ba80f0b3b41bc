//! `handwave` – command line front-end for the gesture engine.
//!
//! | Command | Effect |
//! |---|---|
//! | `handwave run` (default) | Read one JSON `SensorTick` per stdin line, drive a simulated desktop, print events and intents as JSON lines. |
//! | `handwave schema` | Print the JSON Schema of the `SensorTick` input. |
//! | `handwave init [--force]` | Write the default `~/.handwave/config.toml`. |
//!
//! Stdout carries only JSON lines; the banner and logs go to stderr.

mod config;

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use colored::Colorize;
use handwave_motion::SimDesktop;
use handwave_runtime::{GestureEngine, TickReport, init_tracing};
use handwave_types::{DesktopIntent, GestureEvent, HandwaveError, SensorTick, WindowId};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Id of the single window on the simulated desktop.
const SIM_WINDOW: WindowId = WindowId(1);

fn main() {
    let guard = init_tracing("handwave");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str).unwrap_or("run") {
        "run" => run(),
        "schema" => schema(),
        "init" => init(args.iter().any(|a| a == "--force")),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("{} unknown command '{other}'", "error:".red().bold());
            print_usage();
            drop(guard);
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        drop(guard);
        std::process::exit(1);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// run
// ─────────────────────────────────────────────────────────────────────────────

fn run() -> Result<(), HandwaveError> {
    print_banner();

    let (cfg, source) = config::load_effective();
    match source {
        config::ConfigSource::File => eprintln!(
            "  Config loaded from {}",
            config::config_path().display().to_string().bold()
        ),
        config::ConfigSource::Defaults => eprintln!(
            "  No config at {}; using defaults ({} to create one).",
            config::config_path().display(),
            "handwave init".bold()
        ),
        config::ConfigSource::Invalid(e) => {
            eprintln!("  {}: {e}", "Config error".red());
            eprintln!("  Using default configuration.");
        }
    }

    let mut desktop = SimDesktop::new(cfg.display.screen());
    if let Some(area) = cfg.display.work_area {
        desktop = desktop.with_work_area(area);
    }
    if let Some(rect) = cfg.display.window {
        desktop = desktop.with_window(SIM_WINDOW, rect);
    }
    let mut engine = GestureEngine::new(cfg.engine.clone(), desktop);

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("{}", "⚠  Ctrl-C received – stopping …".yellow().bold());
        shutdown_flag.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler");
    }

    eprintln!(
        "  Reading sensor ticks from stdin (signal hand: {}, fling: {}).\n",
        cfg.engine.signal_hand.to_string().bold(),
        cfg.engine.fling_style.to_string().bold()
    );

    // Stdin is read on its own thread so Ctrl-C is noticed between frames
    // even while no input arrives.
    let (lines_tx, lines_rx) = mpsc::channel::<std::io::Result<String>>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = std::io::stdout().lock();
    let mut line_no = 0usize;
    let mut frames = 0usize;
    while !shutdown.load(Ordering::SeqCst) {
        let line = match lines_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(line) => line.map_err(|e| {
                HandwaveError::Serialization(format!("failed to read stdin: {e}"))
            })?,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let tick: SensorTick = match serde_json::from_str(&line) {
            Ok(tick) => tick,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed sensor tick");
                continue;
            }
        };

        match engine.process(&tick) {
            Ok(Some(report)) => {
                frames += 1;
                for out in render_report(&report)? {
                    writeln!(stdout, "{out}").map_err(|e| {
                        HandwaveError::Serialization(format!("failed to write stdout: {e}"))
                    })?;
                }
            }
            Ok(None) => debug!(line = line_no, "no tracked body"),
            Err(e) => warn!(line = line_no, error = %e, "tick failed"),
        }
    }

    info!(frames, mode = %engine.mode(), "input finished");
    eprintln!("{}", format!("  ✓ Processed {frames} frame(s).").green());
    Ok(())
}

/// One line of `run` output.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputLine<'a> {
    Event { event: &'a GestureEvent },
    Intent { intent: &'a DesktopIntent },
}

/// Events first, then intents, one JSON document each.
fn render_report(report: &TickReport) -> Result<Vec<String>, HandwaveError> {
    let events = report.events.iter().map(|event| OutputLine::Event { event });
    let intents = report.intents.iter().map(|intent| OutputLine::Intent { intent });
    events
        .chain(intents)
        .map(|line| {
            serde_json::to_string(&line).map_err(|e| HandwaveError::Serialization(e.to_string()))
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// schema / init
// ─────────────────────────────────────────────────────────────────────────────

fn schema() -> Result<(), HandwaveError> {
    let schema = schemars::schema_for!(SensorTick);
    let json = serde_json::to_string_pretty(&schema)
        .map_err(|e| HandwaveError::Serialization(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn init(force: bool) -> Result<(), HandwaveError> {
    let path = config::config_path();
    if path.exists() && !force {
        return Err(HandwaveError::Config(format!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        )));
    }
    config::save(&config::Config::default())?;
    eprintln!(
        "  {} Config saved to {}",
        "✓".green().bold(),
        path.display().to_string().bold()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    eprintln!();
    eprintln!("{}", r#"  _                    _                          "#.bold().cyan());
    eprintln!("{}", r#" | |__   __ _ _ __   __| |_      ____ ___   _____ "#.bold().cyan());
    eprintln!("{}", r#" | '_ \ / _` | '_ \ / _` \ \ /\ / / _` \ \ / / _ \"#.bold().cyan());
    eprintln!("{}", r#" | | | | (_| | | | | (_| |\ V  V / (_| |\ V /  __/"#.bold().cyan());
    eprintln!("{}", r#" |_| |_|\__,_|_| |_|\__,_| \_/\_/ \__,_| \_/ \___|"#.bold().cyan());
    eprintln!();
    eprintln!(
        "  {} {}",
        "handwave".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("  Body-gesture desktop control");
    eprintln!();
}

fn print_usage() {
    eprintln!("usage: handwave [run | schema | init [--force] | help]");
}

//! Demonstration binary (`SPEC_FULL.md` §4.9).
//!
//! Not a general-purpose binding layer — that role belongs to whatever
//! foreign-function shim eventually wraps `RectManager`. This binary exists
//! to wire configuration, logging and the terminal backend together and
//! exercise a representative slice of the operation surface end to end,
//! the way the teacher's `ox-bin` wires its editor crates together.

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

use strata_config::ConfigFile;
use strata_state::RectManager;
use strata_terminal::{CrosstermBackend, FallbackBackend, TerminalBackend};

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "strata-demo", version, about = "Rect compositor demonstration")]
struct Args {
    /// Optional configuration file path (overrides discovery of `strata.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn configure_logging(config: &ConfigFile) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.logging.level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(path) = &config.logging.file {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("strata.log");
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).try_init();
        Some(guard)
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
        None
    }
}

fn run(args: Args, config: &ConfigFile) -> Result<()> {
    let attached = io::stdout().is_terminal();
    let mut real_backend = CrosstermBackend::new();
    let mut fallback_backend = FallbackBackend::new(config.terminal.fallback_width, config.terminal.fallback_height);

    let (width, height) = if attached {
        real_backend.enter(config.terminal.alternate_screen)?;
        real_backend.size().unwrap_or((config.terminal.fallback_width, config.terminal.fallback_height))
    } else {
        (config.terminal.fallback_width, config.terminal.fallback_height)
    };

    info!(width, height, attached, "demo starting");
    let mut manager = RectManager::new(width, height);

    let banner = manager.create(strata_state::ROOT, width.min(20), 1)?;
    manager.set_fg_color(banner, 2)?;
    manager.set_string(banner, 0, 0, "strata demo running")?;

    let badge = manager.create(strata_state::ROOT, 6, 1)?;
    manager.set_bg_color(badge, 4)?;
    manager.set_string(badge, 0, 0, "LIVE")?;
    manager.set_position(badge, 0, (height.saturating_sub(1)) as i32)?;

    let mut out_buf: Vec<u8> = Vec::new();
    manager.render(strata_state::ROOT, &mut out_buf)?;
    if attached {
        real_backend.write(&out_buf)?;
    } else {
        fallback_backend.write(&out_buf)?;
    }

    thread::sleep(Duration::from_millis(50));

    manager.set_position(badge, 2, (height.saturating_sub(1)) as i32)?;
    out_buf.clear();
    manager.render(strata_state::ROOT, &mut out_buf)?;
    if attached {
        real_backend.write(&out_buf)?;
    } else {
        fallback_backend.write(&out_buf)?;
    }

    let mut reset = Vec::new();
    manager.kill(&mut reset)?;
    if attached {
        real_backend.write(&reset)?;
        real_backend.leave()?;
    }
    info!(config_override = args.config.is_some(), "demo complete");
    Ok(())
}

fn main() {
    let args = Args::parse();
    let config = strata_config::load_from(args.config.as_deref()).unwrap_or_default();
    let _log_guard = configure_logging(&config);

    if let Err(err) = run(args, &config) {
        error!(error = %err, "demo failed");
        let _ = io::stderr().flush();
        std::process::exit(1);
    }
}

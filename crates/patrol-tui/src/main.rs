//! `patrol-tui` — terminal control panel for an inspection patrol service.
//!
//! Polls patrol status and detection results every second, lets the user
//! start or stop the patrol and change the detection interval, and pages
//! through detection results with an image viewer popup.
//!
//! Logs are written to a file (default `/tmp/patrol-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

/// Terminal control panel for inspection patrols.
#[derive(Parser, Debug)]
#[command(name = "patrol-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "PATROL_PROFILE")]
    profile: Option<String>,

    /// Service URL, overrides the profile (e.g., http://127.0.0.1:5000)
    #[arg(short = 'S', long, env = "PATROL_SERVER")]
    server: Option<String>,

    /// Log file path (defaults to /tmp/patrol-tui.log)
    #[arg(long, default_value = "/tmp/patrol-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// TUI owns the terminal. Hold the guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "patrol_tui={log_level},patrol_core={log_level},patrol_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("patrol-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    // Priority: CLI flags > config file > built-in defaults
    let cfg = patrol_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());
    let mut profile = cfg.profile_or_default(&profile_name);
    if let Some(server) = &cli.server {
        profile.server.clone_from(server);
    }
    let page_size = cfg.page_size(&profile);
    let config = patrol_config::profile_to_controller_config(&profile, &cfg.defaults)?;

    info!(
        profile = %profile_name,
        server = %config.url,
        page_size,
        "starting patrol-tui"
    );

    let mut app = App::new(config, page_size)?;
    app.run().await?;

    Ok(())
}

//! Vitals monitor CLI entry point
//!
//! Simulates one or more bedside monitors and draws them in the terminal,
//! or dumps their snapshots as JSON.

use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitals_core::alarms;
use vitals_core::config::{ConfigLoader, DisplayConfig, MonitorConfig};
use vitals_core::playback::{CasePlayer, RecordedCase};
use vitals_core::render::{FrameDriver, PatientMonitor, TextCanvas};
use vitals_core::store::VitalSignsStore;

/// Simulated patient monitor
#[derive(Debug, Parser)]
#[command(name = "vitals-monitor", version, about)]
struct Cli {
    /// TOML configuration file (must exist)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device id to simulate; repeat for several monitors
    #[arg(short, long = "device", default_value = "demo-1")]
    devices: Vec<String>,

    /// How long to run
    #[arg(short, long, default_value_t = 5)]
    seconds: u64,

    /// Terminal columns per monitor
    #[arg(long, default_value_t = 100)]
    width: usize,

    /// Terminal rows per monitor
    #[arg(long, default_value_t = 30)]
    height: usize,

    /// Master seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Recorded case (JSON) to play into every device
    #[arg(long = "case")]
    case_file: Option<PathBuf>,

    /// Print final snapshots as JSON instead of drawing
    #[arg(long)]
    json: bool,

    /// Print library name, version and features, then exit
    #[arg(long)]
    info: bool,
}

/// Fit the strip geometry to a character grid
fn terminal_display(base: &DisplayConfig, cols: usize, rows: usize) -> DisplayConfig {
    let strips = vitals_core::WaveformKind::DISPLAY_ORDER.len();
    DisplayConfig {
        width: cols,
        height: (rows.saturating_sub(3) / strips).max(1),
        value_panel_width: (cols / 8).max(6),
        ..base.clone()
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_paths(Vec::new()).require_file(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load().context("loading configuration")?;

    if cli.seed.is_some() {
        config.store.seed = cli.seed;
    }
    config.display = terminal_display(&config.display, cli.width, cli.height);
    config.validate().context("validating command line overrides")?;
    Ok(config)
}

/// Start one case player per device; they stop at the end of the case
fn start_playback(
    store: &Arc<VitalSignsStore>,
    config: &MonitorConfig,
    path: &Path,
) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let case = Arc::new(
        RecordedCase::from_json_file(path).with_context(|| format!("loading recorded case {}", path.display()))?,
    );
    let range = case.time_range();
    info!(
        case = %path.display(),
        samples = case.len(),
        start = range.min,
        end = range.max,
        "recorded case loaded"
    );

    Ok(store
        .device_ids()
        .into_iter()
        .map(|id| {
            let player = CasePlayer::new(case.clone(), id, &config.playback);
            let store = store.clone();
            tokio::spawn(async move {
                player.run(store).await;
            })
        })
        .collect())
}

async fn run_json(store: &VitalSignsStore, cli: &Cli) -> anyhow::Result<()> {
    tokio::time::sleep(Duration::from_secs(cli.seconds)).await;
    for id in store.device_ids() {
        if let Some(snapshot) = store.snapshot(id.as_str()) {
            println!("{}", snapshot.to_json_pretty()?);
        }
    }
    Ok(())
}

async fn run_display(store: Arc<VitalSignsStore>, config: &MonitorConfig, cli: &Cli) -> anyhow::Result<()> {
    let ansi = std::io::stdout().is_terminal();
    let deadline = Instant::now() + Duration::from_secs(cli.seconds);
    let frames_per_print = (1000 / config.store.tick_interval_ms.max(1)).max(1);

    let mut tasks = Vec::new();
    for id in store.device_ids() {
        let monitor = PatientMonitor::new(id.clone(), config.display.clone());
        let mut driver = FrameDriver::new(store.clone(), monitor, TextCanvas::new(cli.width, cli.height));
        tasks.push(tokio::spawn(async move {
            while let Ok(Some(frames)) = timeout_at(deadline, driver.next_frame()).await {
                if frames % frames_per_print == 0 {
                    let canvas = driver.surface();
                    let text = if ansi { canvas.render_ansi() } else { canvas.render_plain() };
                    println!("{}\n", text);
                }
            }
            driver
        }));
    }

    for task in tasks {
        let driver = task.await.context("monitor task failed")?;
        let id = driver.monitor().device_id().clone();
        info!(device = %id, frames = driver.monitor().frames(), "monitor finished");
        if let Some(report) = store.with_snapshot(id.as_str(), alarms::evaluate) {
            for entry in report.active() {
                info!(
                    device = %id,
                    parameter = entry.parameter.label(),
                    value = entry.value,
                    status = %entry.status,
                    "alarm active"
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let library = vitals_core::version_info();
    if cli.info {
        println!("{} {}\n{}", library.name, library.version, library.description);
        for feature in &library.features {
            println!("  - {}", feature);
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    info!(library = %library.name, version = %library.version, devices = ?cli.devices, "starting monitor");

    let store = Arc::new(VitalSignsStore::new(config.store.clone())?);
    for id in &cli.devices {
        store.add_device(id.as_str())?;
    }

    let players = match &cli.case_file {
        Some(path) => start_playback(&store, &config, path)?,
        None => Vec::new(),
    };

    if cli.json {
        run_json(&store, &cli).await?;
    } else {
        run_display(store.clone(), &config, &cli).await?;
    }

    for player in players {
        player.abort();
    }
    store.shutdown();
    Ok(())
}

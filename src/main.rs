use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;

use procdash::config::{self, Config};
use procdash::format;
use procdash::session::{MonitorEvent, MonitorSession};
use procdash::system::collector::Collector;
use procdash::system::kill;
use procdash::system::snapshot::Snapshot;

#[derive(Parser)]
#[command(
    name = "procdash",
    about = "Headless process and resource monitor with rolling usage history"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tick interval in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Case-insensitive substring filter for process names
    #[arg(long, default_value = "")]
    filter: String,

    /// Number of ticks to run before exiting
    #[arg(long, default_value_t = 10)]
    ticks: u64,

    /// Print one process snapshot and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Send SIGTERM to this pid, then show a refreshed table
    #[arg(long)]
    terminate: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    if let Some(pid) = cli.terminate {
        return run_terminate(pid, &cli.filter);
    }
    if cli.once {
        return run_once(&cli.filter);
    }
    run_monitor(config, &cli).await
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }

    config
}

fn print_table(snapshot: &Snapshot) {
    println!("{}", format::table_header());
    for info in snapshot {
        println!("{}", format::format_row(info));
    }
    println!("({} processes)", snapshot.len());
}

/// Single enumeration, two passes a beat apart so per-process CPU% has a
/// delta to work with instead of reading 0.0 across the board.
fn run_once(filter: &str) -> Result<()> {
    let mut collector = Collector::new();
    let _ = collector.enumerate(filter);
    std::thread::sleep(Duration::from_millis(200));
    print_table(&collector.enumerate(filter));
    Ok(())
}

fn run_terminate(pid: u32, filter: &str) -> Result<()> {
    match kill::terminate(pid) {
        Ok(()) => {
            println!("SIGTERM delivered to {pid}");
            // The signal may still be in flight; the refreshed table shows
            // whatever the process set looks like right now.
            print_table(&Collector::new().enumerate(filter));
            Ok(())
        }
        Err(err) => Err(eyre!("{err}")),
    }
}

async fn run_monitor(config: Config, cli: &Cli) -> Result<()> {
    let mut session = MonitorSession::start(&config);
    session.request_refresh(&cli.filter);

    let mut remaining = cli.ticks;
    while remaining > 0 {
        match session.next_event().await {
            Some(MonitorEvent::Sample { sample, .. }) => {
                println!("{}", format::format_sample(&sample));
                remaining -= 1;
            }
            Some(MonitorEvent::SampleFailed { error, .. }) => {
                eprintln!("sampling failed: {error}");
                remaining -= 1;
            }
            Some(MonitorEvent::Snapshot { snapshot, .. }) => {
                print_table(&snapshot);
            }
            None => break,
        }
    }

    let (cpu, memory) = session.history();
    println!(
        "history: {} samples (cpu last {:?}, mem last {:?})",
        cpu.len(),
        cpu.last(),
        memory.last()
    );
    session.stop();
    Ok(())
}

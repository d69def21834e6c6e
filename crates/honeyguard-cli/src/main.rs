use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use honeyguard_client::ApiClient;
use honeyguard_core::SocConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod snapshot;

use snapshot::Snapshot;

const DEFAULT_HOME: &str = "~/.honeyguard";

#[derive(Parser)]
#[command(name = "honeyguard", version, about = "honeyguard SOC dashboard for the scam honeypot")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Config file (defaults to ~/.honeyguard/config.yaml when present)"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Backend base URL, overrides HONEYGUARD_API_URL and the config file"
    )]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    #[command(about = "Run the live terminal dashboard (default)")]
    Dashboard,
    #[command(about = "Poll the backend once and print metrics, feed and intel")]
    Snapshot {
        #[arg(long, help = "Print the raw snapshot as JSON")]
        json: bool,
    },
    #[command(about = "Report flagged UPI IDs to NPCI through the backend")]
    Report,
    #[command(about = "Validate configuration")]
    Validate,
    #[command(about = "Run the scripted honeypot mock backend")]
    Mock {
        #[arg(long, default_value_t = honeyguard_mock::DEFAULT_PORT, help = "Port to listen on")]
        port: u16,
        #[arg(long, default_value = "2000", help = "Milliseconds between scripted turns, 0 disables")]
        tick_ms: u64,
    },
}

fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(path.strip_prefix("~").unwrap_or(path));
        }
    }
    path.to_path_buf()
}

/// Explicit `--config` must exist; the default location is optional.
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(expand_tilde(path)),
        None => {
            let default = expand_tilde(Path::new(DEFAULT_HOME)).join("config.yaml");
            default.exists().then_some(default)
        }
    }
}

fn init_logging(config: &SocConfig, to_stderr: bool) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = match &config.logging.dir {
        Some(dir) => expand_tilde(dir),
        None => expand_tilde(Path::new(DEFAULT_HOME)).join("logs"),
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "honeyguard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(to_stderr.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);

    let path = config_path(cli.config.as_deref());
    let config = SocConfig::resolve_from_env(path.as_deref(), cli.api_url)?;

    // The TUI owns the terminal, so it only logs to file.
    let _guard = init_logging(&config, command != Commands::Dashboard)?;
    tracing::debug!(config_path = ?path, base_url = %config.api.base_url, "configuration loaded");

    let client = ApiClient::http(config.api.base_url.clone(), config.request_timeout());

    match command {
        Commands::Dashboard => {
            honeyguard_tui::run_tui(client, &config.polling, &config.api.base_url).await?;
        }
        Commands::Snapshot { json } => {
            let snapshot = Snapshot::take(&client).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", snapshot.render_text()?);
            }
        }
        Commands::Report => {
            let result = client.report_scam().await;
            if !result.is_success() {
                bail!("{}", result.message);
            }
            println!("{}", result.message);
        }
        Commands::Validate => {
            println!(
                "Config valid. backend {}, stats every {} ms, intel every {} ms, request timeout {}.",
                config.api.base_url,
                config.polling.stats_interval_ms,
                config.polling.intel_interval_ms,
                config
                    .api
                    .request_timeout_ms
                    .map(|ms| format!("{ms} ms"))
                    .unwrap_or_else(|| "none".to_string()),
            );
        }
        Commands::Mock { port, tick_ms } => {
            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("interrupt received, stopping mock");
                }
                on_signal.cancel();
            });
            let tick = (tick_ms > 0).then(|| Duration::from_millis(tick_ms));
            honeyguard_mock::serve(&format!("0.0.0.0:{port}"), tick, cancel).await?;
        }
    }

    Ok(())
}

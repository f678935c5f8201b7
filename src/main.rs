use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use vitrine::app::{App, AppEvent};
use vitrine::catalog::HttpItemSource;
use vitrine::config::Config;
use vitrine::criteria::{Location, LocationError};
use vitrine::sync::{AddressBar, SessionLocation};
use vitrine::ui;
use vitrine::util::validate_endpoint;

#[derive(Parser, Debug)]
#[command(
    name = "vitrine",
    about = "Terminal catalog browser with live search and pricing filters"
)]
struct Args {
    /// Catalog endpoint returning a JSON array of items
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Starting location, e.g. "/catalog?search=coat&free=true"
    #[arg(long, value_name = "PATH", value_parser = parse_location, default_value = "/")]
    location: String,

    /// Config file (default: ~/.config/vitrine/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Accept only absolute locations, but keep the text as given.
fn parse_location(raw: &str) -> Result<String, LocationError> {
    raw.parse::<Location>()?;
    Ok(raw.to_string())
}

/// Logs go to `--log-file` when given. Otherwise they go to stderr, and
/// only if `RUST_LOG` asks for them, since the TUI owns the terminal.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if std::env::var_os("RUST_LOG").is_some() => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    let Some(endpoint) = args.endpoint.clone().or_else(|| config.endpoint.clone()) else {
        eprintln!("Error: No catalog endpoint configured");
        eprintln!();
        eprintln!("Pass one on the command line:");
        eprintln!("  vitrine --endpoint https://shop.example.com/api/items");
        eprintln!();
        eprintln!("Or set `endpoint` in ~/.config/vitrine/config.toml.");
        std::process::exit(1);
    };
    let endpoint = validate_endpoint(&endpoint).context("Invalid catalog endpoint")?;

    let source = HttpItemSource::new(endpoint, config.request_timeout())
        .context("Failed to build HTTP client")?;
    tracing::info!(endpoint = %source.endpoint(), location = %args.location, "Starting session");

    let mut app = App::new(
        SessionLocation::new(args.location),
        config.session_settings(),
    );

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    app.start_load(Arc::new(source), event_tx);

    // Run the TUI
    ui::run(&mut app, event_rx).await?;

    println!("{}", app.address_bar().location());
    Ok(())
}

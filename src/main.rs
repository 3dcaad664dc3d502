mod client;
mod config;
mod poller;
mod render;
mod settings;
mod snapshot;
mod web;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use client::{BackendClient, SettingsApi, SnapshotSource};
use crate::config::{MonitorConfig, DEFAULT_CONFIG_FILE};
use poller::{DashboardSession, RenderTarget, SchedulerConfig, TerminalTarget};
use render::{build_view, ViewKind};
use settings::{SettingsController, SettingsField};
use web::{start_dashboard_server, AppState, ViewBoard};

#[derive(Parser)]
#[command(name = "trade-monitor")]
#[command(version)]
#[command(about = "Live monitoring dashboard for the futures trading bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Backend base URL (overrides config)
    #[arg(short, long, global = true)]
    backend: Option<String>,

    /// Poll period in milliseconds (overrides config)
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render views in the terminal until Ctrl-C
    Watch {
        /// Views to render (repeatable)
        #[arg(long = "view", value_enum)]
        views: Vec<ViewKind>,
    },
    /// Serve every view as a self-refreshing page
    Serve {
        /// Dashboard port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Inspect or edit the bot's runtime settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings form
    Show,
    /// Edit fields and submit the form
    Save {
        #[arg(long)]
        use_testnet: Option<String>,
        #[arg(long)]
        dry_run: Option<String>,
        #[arg(long)]
        leverage: Option<String>,
        #[arg(long)]
        universe_size: Option<String>,
        #[arg(long)]
        max_positions: Option<String>,
        /// Comma separated strategy ids
        #[arg(long, conflicts_with = "clear_strategies")]
        strategies: Option<String>,
        /// Deselect every strategy (submits "auto")
        #[arg(long)]
        clear_strategies: bool,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(cli: &Cli) -> Result<MonitorConfig> {
    let mut config = MonitorConfig::load(&cli.config)?;
    config.apply_overrides(cli.backend.clone(), cli.interval_ms);
    config
        .validate()
        .map_err(|errors| anyhow!("Invalid configuration: {}", errors.join("; ")))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_json);

    let config = load_config(&cli)?;
    info!("Trade Monitor v{} (backend {})", env!("CARGO_PKG_VERSION"), config.backend_url);

    match cli.command {
        Commands::Watch { views } => {
            run_watch(&config, views).await?;
        }
        Commands::Serve { port } => {
            run_serve(&config, port.unwrap_or(config.dashboard_port)).await?;
        }
        Commands::Settings { action } => {
            run_settings(&config, action).await?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

async fn run_watch(config: &MonitorConfig, mut views: Vec<ViewKind>) -> Result<()> {
    if views.is_empty() {
        views.push(ViewKind::Overview);
    }
    views.sort();
    views.dedup();

    let source: Arc<dyn SnapshotSource> = Arc::new(BackendClient::new(&config.backend_url));
    let target: Arc<dyn RenderTarget> = Arc::new(TerminalTarget::new());
    let renderers = views.iter().map(|&kind| build_view(kind, config.log_tail)).collect();

    let mut session = DashboardSession::new(source, target, renderers, SchedulerConfig::from(config));
    session.start();
    info!(session = %session.id(), "Watching {} view(s), Ctrl-C to stop", views.len());

    tokio::signal::ctrl_c().await?;
    session.shutdown();

    let counts = session.counts();
    info!(
        "Watch stopped: {} cycles started, {} rendered, {} failed, {} skipped",
        counts.started, counts.rendered, counts.failed, counts.skipped
    );
    Ok(())
}

async fn run_serve(config: &MonitorConfig, port: u16) -> Result<()> {
    let client = Arc::new(BackendClient::new(&config.backend_url));
    let board = ViewBoard::new();
    info!("Serving {} views polled from {}", ViewKind::all().len(), client.base_url());

    // Every page polls on its own, like separately opened browser tabs.
    let mut sessions: Vec<DashboardSession> = ViewKind::all()
        .into_iter()
        .map(|kind| {
            let source: Arc<dyn SnapshotSource> = client.clone();
            let target: Arc<dyn RenderTarget> = Arc::new(board.clone());
            DashboardSession::new(
                source,
                target,
                vec![build_view(kind, None)],
                SchedulerConfig::from(config),
            )
        })
        .collect();
    for session in &mut sessions {
        session.start();
    }

    let settings_api: Arc<dyn SettingsApi> = client.clone();
    let state = AppState::new(board, settings_api, config);
    let result = start_dashboard_server(state, port).await;

    for session in &mut sessions {
        session.shutdown();
    }
    if let Err(e) = &result {
        error!("Dashboard server error: {}", e);
    }
    result
}

async fn run_settings(config: &MonitorConfig, action: SettingsAction) -> Result<()> {
    let api: Arc<dyn SettingsApi> = Arc::new(BackendClient::new(&config.backend_url));
    let mut controller = SettingsController::new(api);

    let form = controller
        .load()
        .await
        .map_err(|e| anyhow!("Failed to load settings: {}", e))?;

    match action {
        SettingsAction::Show => {
            for field in SettingsField::ALL {
                if field == SettingsField::Strategies {
                    continue;
                }
                let value = form.value(field);
                if value.is_empty() {
                    println!("{}: (unset, backend default {})", field, field.backend_default());
                } else {
                    println!("{}: {}", field, value);
                }
            }
            println!("{}: {}", SettingsField::Strategies, form.value(SettingsField::Strategies));
            for option in form.strategies.options() {
                let mark = if option.selected { "x" } else { " " };
                println!("  [{}] {}", mark, option.id);
            }
        }
        SettingsAction::Save {
            use_testnet,
            dry_run,
            leverage,
            universe_size,
            max_positions,
            strategies,
            clear_strategies,
        } => {
            let form = controller
                .form_mut()
                .ok_or_else(|| anyhow!("Settings form not loaded"))?;

            let edits = [
                (SettingsField::UseTestnet, use_testnet),
                (SettingsField::DryRun, dry_run),
                (SettingsField::Leverage, leverage),
                (SettingsField::UniverseSize, universe_size),
                (SettingsField::MaxPositions, max_positions),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    form.set(field, &value);
                }
            }

            if clear_strategies {
                form.strategies.clear();
            } else if let Some(ids) = strategies {
                let unknown = form.set(SettingsField::Strategies, &ids);
                if !unknown.is_empty() {
                    return Err(anyhow!("Unknown strategies: {}", unknown.join(", ")));
                }
            }

            form.validate()
                .map_err(|errors| anyhow!("Invalid settings: {}", errors.join("; ")))?;

            let outcome = controller.save().await;
            println!("{}", outcome.notice());
            if !outcome.is_saved() {
                warn!("Settings were not saved");
                return Err(anyhow!(outcome.notice()));
            }
        }
    }

    Ok(())
}

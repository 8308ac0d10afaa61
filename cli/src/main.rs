//! MarktAuto CLI
//!
//! Terminal dashboard for the MarktAuto marketing API.
//!
//! # Usage
//!
//! ```bash
//! marktauto register --email ann@example.com --password s3cret
//! marktauto segments create --name "US adults" --criteria "country = US"
//! marktauto campaigns create --name "Spring Sale" --channel email --segment-id 1
//! marktauto campaigns launch 1
//! marktauto analytics record 1 view
//! marktauto analytics show --format json
//! marktauto dashboard
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use marktauto_client::config::DEFAULT_API_URL;
use marktauto_client::{ClientConfig, FileSessionStore, MemorySessionStore, Route, SessionStore, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "marktauto")]
#[command(author = "MarktAuto")]
#[command(version)]
#[command(about = "MarktAuto Marketing Dashboard", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// API base URL
    #[arg(long, global = true, env = "MARKTAUTO_API_URL")]
    api_url: Option<String>,

    /// File the session token is persisted to
    #[arg(long, global = true, env = "MARKTAUTO_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    no_persist: bool,

    /// Output format
    #[arg(long, short, global = true)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    /// Log filter, e.g. `debug` or `marktauto_client=trace`
    #[arg(long, global = true, env = "MARKTAUTO_LOG")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Manage audience segments
    Segments {
        #[command(subcommand)]
        action: SegmentCommands,
    },
    /// Draft and launch campaigns
    Campaigns {
        #[command(subcommand)]
        action: CampaignCommands,
    },
    /// View performance and record events
    Analytics {
        #[command(subcommand)]
        action: AnalyticsCommands,
    },
    /// Render the page at a path, e.g. `/analytics`
    Open { path: String },
    /// Interactive dashboard
    Dashboard,
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum SegmentCommands {
    /// List all segments
    List,
    /// Create a new segment
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        criteria: String,
    },
}

#[derive(Subcommand)]
pub enum CampaignCommands {
    /// List all campaigns
    List,
    /// Draft a new campaign
    Create {
        #[arg(long)]
        name: String,
        /// email, sms, social, ads, ...
        #[arg(long)]
        channel: String,
        #[arg(long)]
        segment_id: i64,
        #[arg(long)]
        schedule: Option<String>,
    },
    /// Launch a draft campaign
    Launch { id: i64 },
}

#[derive(Subcommand)]
pub enum AnalyticsCommands {
    /// Per-campaign views, clicks, CTR and revenue
    Show,
    /// Record an engagement event
    Record {
        campaign_id: i64,
        /// view, click, sent, opened, converted, ...
        event_type: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.log_level.as_deref());

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Config { action } => commands::config::handle(action, global.profile.as_deref()),
        Commands::Login { email, password } => {
            let mut app = connect(global)?;
            commands::auth::login(&mut app, email, password).await
        }
        Commands::Register { email, password } => {
            let mut app = connect(global)?;
            commands::auth::register(&mut app, email, password).await
        }
        Commands::Logout => commands::auth::logout(&mut connect(global)?),
        Commands::Segments { action } => {
            let mut app = start(global).await?;
            commands::segments::handle(action, &mut app).await
        }
        Commands::Campaigns { action } => {
            let mut app = start(global).await?;
            commands::campaigns::handle(action, &mut app).await
        }
        Commands::Analytics { action } => {
            let mut app = start(global).await?;
            commands::analytics::handle(action, &mut app).await
        }
        Commands::Open { path } => {
            let route: Route = path.parse()?;
            start(global).await?.show(route)
        }
        Commands::Dashboard => {
            let mut app = start(global).await?;
            commands::dashboard::run(&mut app).await
        }
    }
}

/// Builds the shell from flags, then the profile file, then built-in defaults
fn connect(global: &GlobalArgs) -> Result<commands::App> {
    let file = config::Config::load(global.profile.as_deref()).context("loading CLI configuration")?;

    let client_config = ClientConfig::new(
        global
            .api_url
            .clone()
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        global
            .session_file
            .clone()
            .or(file.session_file)
            .unwrap_or_else(ClientConfig::default_session_file),
    );
    let format = match (global.format, file.default_format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => output::OutputFormat::from_str(name, true)
            .map_err(|e| anyhow::anyhow!("invalid default_format: {e}"))?,
        (None, None) => output::OutputFormat::default(),
    };

    let session: Arc<dyn SessionStore> = if global.no_persist {
        Arc::new(MemorySessionStore::new())
    } else {
        Arc::new(FileSessionStore::open(&client_config.session_file))
    };
    tracing::debug!(api_url = %client_config.api_url, "Starting");

    let shell = Shell::new(&client_config, session)?;
    Ok(commands::App::new(shell, format))
}

/// Connects and loads the collections when a session is stored
async fn start(global: &GlobalArgs) -> Result<commands::App> {
    let mut app = connect(global)?;
    app.shell.start().await;
    Ok(app)
}

//! Court bot daemon: entry point for running the bot.

use anyhow::Context;
use clap::Parser;
use court_node::{open_record_store, records_reply, BotConfig, BotMode, CourtBot};
use court_utils::{init_logging, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "court-daemon", about = "Group court bot: votes on bailans, warnings and pardons")]
struct Cli {
    /// Bot API token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// How updates arrive: "polling" (development) or "webhook" (production).
    #[arg(long, env = "BOT_MODE")]
    mode: Option<BotMode>,

    /// Port for the HTTP server.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Public base URL; the webhook is registered at `{url}/webhook`.
    #[arg(long, env = "EXTERNAL_URL")]
    external_url: Option<String>,

    /// Bot API base URL.
    #[arg(long, env = "TELEGRAM_API_BASE")]
    api_base_url: Option<String>,

    /// Data directory for record storage.
    #[arg(long, env = "COURT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable the Prometheus metrics endpoint.
    #[arg(long, env = "COURT_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "COURT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "COURT_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the bot until SIGINT/SIGTERM.
    Run,
    /// Print stored records and exit.
    Records {
        /// Only this roster member.
        user: Option<String>,
    },
    /// Print the effective configuration (without the token) and exit.
    Config,
}

/// Layer CLI flags and env vars over the config file (or the defaults).
fn build_config(cli: &Cli) -> anyhow::Result<BotConfig> {
    let base = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            BotConfig::from_toml_file(&path)
                .with_context(|| format!("failed to load config file {path}"))?
        }
        None => BotConfig::default(),
    };

    Ok(BotConfig {
        mode: cli.mode.unwrap_or(base.mode),
        port: cli.port.unwrap_or(base.port),
        bot_token: cli.token.clone().unwrap_or(base.bot_token),
        api_base_url: cli.api_base_url.clone().unwrap_or(base.api_base_url),
        external_url: cli.external_url.clone().or(base.external_url),
        data_dir: cli.data_dir.clone().unwrap_or(base.data_dir),
        log_format: cli
            .log_format
            .as_deref()
            .map(LogFormat::parse)
            .unwrap_or(base.log_format),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        enable_metrics: cli.metrics || base.enable_metrics,
        ..base
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Run => {
            tracing::info!(
                mode = %config.mode,
                port = config.port,
                metrics = config.enable_metrics,
                "starting court bot"
            );
            let bot = CourtBot::new(config).context("invalid configuration")?;
            bot.run().await?;
            tracing::info!("court daemon exited cleanly");
        }
        Command::Records { user } => {
            let store = open_record_store(&config.data_dir).with_context(|| {
                format!("failed to open records in {}", config.data_dir.display())
            })?;
            println!("{}", records_reply(&store, &config.roster(), user.as_deref()));
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

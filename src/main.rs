use clap::{Parser, Subcommand};
use std::fmt::Write;
use tgpoll_channels::telegram::{join_allowed_updates, PollOptions, PollingClient};
use tgpoll_core::config::{self, redact_token, shellexpand, AppConfig, Config};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "tgpoll",
    version,
    about = "Long-polling client for the Telegram Bot API"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Bot token, used when the config file leaves it empty.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll getUpdates until interrupted.
    Start {
        /// Long-poll timeout in seconds.
        #[arg(long)]
        timeout: Option<u32>,
        /// Updates per request (1-100, 0 = server default).
        #[arg(long)]
        limit: Option<u8>,
        /// Comma-separated update types, e.g. `message,edited_message`.
        /// An empty value clears a filter set in the config.
        #[arg(long, value_delimiter = ',')]
        allowed_updates: Option<Vec<String>>,
    },
    /// Print the effective configuration.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load(&cli.config)?;
    if cfg.telegram.bot_token.trim().is_empty() {
        if let Some(token) = cli.token.as_deref() {
            cfg.telegram.bot_token = token.to_string();
        }
    }

    let _guard = init_tracing(&cfg.app);

    match cli.command {
        Commands::Start {
            timeout,
            limit,
            allowed_updates,
        } => {
            if let Some(t) = timeout {
                cfg.polling.timeout_secs = t;
            }
            if let Some(l) = limit {
                cfg.polling.limit = l;
            }
            if let Some(names) = allowed_updates {
                cfg.polling.allowed_updates = PollOptions::parse_allowed_updates(&names)?;
            }

            if cfg.telegram.bot_token.trim().is_empty() {
                anyhow::bail!(
                    "bot_token is empty. Set it in config.toml, pass --token, \
                     or set TELEGRAM_BOT_TOKEN."
                );
            }

            let mut client = PollingClient::from_config(&cfg)?;
            let options = PollOptions::from(&cfg.polling);

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => info!("interrupt received, stopping"),
                    Err(e) => warn!("failed to listen for ctrl-c: {e}"),
                }
                on_signal.cancel();
            });

            client.start_polling(options, cancel).await?;
        }
        Commands::Status => {
            print!("{}", status_report(&cli.config, &cfg));
        }
    }

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// The returned guard flushes the file writer on drop; keep it alive.
fn init_tracing(app: &AppConfig) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&app.log_level));

    match app.log_dir.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(shellexpand(dir), "tgpoll.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

/// Human-readable summary of the effective configuration.
fn status_report(config_path: &str, cfg: &Config) -> String {
    let token = if cfg.telegram.bot_token.is_empty() {
        "missing".to_string()
    } else {
        redact_token(&cfg.telegram.bot_token)
    };
    let allowed = if cfg.polling.allowed_updates.is_empty() {
        "all".to_string()
    } else {
        join_allowed_updates(&cfg.polling.allowed_updates)
    };
    let validity = match cfg.validate() {
        Ok(()) => "valid".to_string(),
        Err(e) => e.to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "tgpoll status\n");
    let _ = writeln!(out, "Config: {config_path}");
    let _ = writeln!(out, "  bot_token:       {token}");
    let _ = writeln!(out, "  api_base_url:    {}", cfg.telegram.api_base_url);
    let _ = writeln!(out, "  timeout:         {}s", cfg.polling.timeout_secs);
    let _ = writeln!(out, "  limit:           {}", cfg.polling.limit);
    let _ = writeln!(out, "  allowed_updates: {allowed}");
    let _ = writeln!(
        out,
        "  retry:           {}ms initial, {}ms max, x{}",
        cfg.retry.initial_backoff_ms, cfg.retry.max_backoff_ms, cfg.retry.multiplier
    );
    let _ = writeln!(out, "\n  config: {validity}");
    out
}

/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Wallet sign-in and dashboard commands against the Nakarobo API
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use nakarobo_cli::cli::init::run_init;
use nakarobo_cli::cli::quests::DEFAULT_ACTIVITY_ID;
use nakarobo_cli::cli::{AppContext, dashboard, quests, session, social};
use nakarobo_cli::config::{AppConfig, default_config_path};

#[derive(Parser, Debug)]
#[command(name = "nakarobo-cli", version, about = "Nakarobo wallet sign-in and dashboard")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Write logs to daily files in this directory instead of stderr
    #[arg(long = "log-dir", value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a configuration file interactively
    Init {
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Sign in with the configured wallet
    Login {
        /// Sign again even if a session for this wallet exists
        #[arg(long)]
        force: bool,
    },
    /// Drop the session and disconnect the wallet
    Logout,
    /// Show session and wallet status
    Status {
        /// Also list the chain configuration served by the API
        #[arg(long)]
        chains: bool,
    },
    /// Node details and asset summary
    Node {
        #[command(subcommand)]
        action: Option<NodeAction>,
    },
    /// Deposit and redeem history
    Funds {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Points balance, optionally with the leaderboard
    Points {
        #[arg(long)]
        leaderboard: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Network stats and leaderboard
    Network {
        #[arg(long, default_value = "deposited")]
        sort: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// Daily quests
    Quests {
        #[command(subcommand)]
        action: Option<QuestAction>,
    },
    /// Referral program
    Referral {
        #[command(subcommand)]
        action: Option<ReferralAction>,
    },
    /// Twitter link and Yappers scores
    Yappers {
        #[command(subcommand)]
        action: Option<YappersAction>,
    },
}

#[derive(Subcommand, Debug)]
enum NodeAction {
    /// Validate a node name and amount without sending anything
    Check {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long, default_value = "0")]
        min: Decimal,
    },
    /// Show a random avatar, or refresh the node's avatar
    Avatar {
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Subcommand, Debug)]
enum QuestAction {
    CheckIn,
    ClaimProof {
        #[arg(long, default_value = DEFAULT_ACTIVITY_ID)]
        activity_id: String,
    },
    Leaderboard {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ReferralAction {
    Bind { code: String },
    Skip,
    Stats,
}

#[derive(Subcommand, Debug)]
enum YappersAction {
    /// Print the Twitter authorize URL
    Connect,
    /// Complete the link with the code from the redirect
    Callback {
        #[arg(long)]
        code: String,
    },
    Status,
    /// Generate post drafts for a prompt
    Drafts {
        #[arg(long)]
        prompt: String,
    },
    Disconnect,
    Leaderboard {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        #[arg(long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let _log_guard = init_tracing(&args.log_level, args.log_dir.as_deref())?;

    let Some(command) = args.command else {
        if args.dry_run {
            load_config(args.config_path.as_deref())?;
            info!("dry-run requested; configuration validated");
            return Ok(());
        }
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Command::Init { output } = command {
        let output = output
            .or(args.config_path)
            .unwrap_or_else(default_config_path);
        return run_init(output);
    }

    let config = load_config(args.config_path.as_deref())?;
    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let ctx = AppContext::new(config).await.context("initialize")?;
    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    run(&ctx, command, shutdown).await
}

async fn run(ctx: &AppContext, command: Command, shutdown: CancellationToken) -> Result<()> {
    match command {
        Command::Init { .. } => Ok(()),
        Command::Login { force } => session::login(ctx, force, shutdown).await,
        Command::Logout => session::logout(ctx).await,
        Command::Status { chains } => session::status(ctx, chains).await,
        Command::Node { action: None } => dashboard::node(ctx).await,
        Command::Node {
            action: Some(NodeAction::Check { name, amount, min }),
        } => dashboard::node_check(name.as_deref(), amount.as_deref(), min),
        Command::Node {
            action: Some(NodeAction::Avatar { refresh }),
        } => dashboard::avatar(ctx, refresh).await,
        Command::Funds { page, page_size } => dashboard::funds(ctx, page, page_size).await,
        Command::Points {
            leaderboard,
            page,
            page_size,
        } => dashboard::points(ctx, leaderboard, page, page_size).await,
        Command::Network {
            sort,
            page,
            page_size,
        } => dashboard::network(ctx, &sort, page, page_size).await,
        Command::Quests { action: None } => quests::summary(ctx).await,
        Command::Quests {
            action: Some(QuestAction::CheckIn),
        } => quests::check_in(ctx).await,
        Command::Quests {
            action: Some(QuestAction::ClaimProof { activity_id }),
        } => quests::claim_proof(ctx, &activity_id).await,
        Command::Quests {
            action:
                Some(QuestAction::Leaderboard {
                    page,
                    page_size,
                    search,
                }),
        } => quests::leaderboard(ctx, page, page_size, search.as_deref()).await,
        Command::Referral { action: None } => social::referral(ctx).await,
        Command::Referral {
            action: Some(ReferralAction::Bind { code }),
        } => social::bind_referral(ctx, &code).await,
        Command::Referral {
            action: Some(ReferralAction::Skip),
        } => social::skip_referral(ctx).await,
        Command::Referral {
            action: Some(ReferralAction::Stats),
        } => social::referral_stats(ctx).await,
        Command::Yappers {
            action: None | Some(YappersAction::Status),
        } => social::yappers_status(ctx).await,
        Command::Yappers {
            action: Some(YappersAction::Connect),
        } => social::yappers_connect(ctx).await,
        Command::Yappers {
            action: Some(YappersAction::Callback { code }),
        } => social::yappers_callback(ctx, &code).await,
        Command::Yappers {
            action: Some(YappersAction::Drafts { prompt }),
        } => social::yappers_drafts(ctx, &prompt).await,
        Command::Yappers {
            action: Some(YappersAction::Disconnect),
        } => social::yappers_disconnect(ctx).await,
        Command::Yappers {
            action:
                Some(YappersAction::Leaderboard {
                    page,
                    page_size,
                    search,
                }),
        } => social::yappers_leaderboard(ctx, page, page_size, search.as_deref()).await,
    }
}

fn init_tracing(log_level: &str, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "nakarobo-cli.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("initialize tracing subscriber")?;
            Ok(None)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                AppConfig::from_file(&path)
                    .with_context(|| format!("load config {}", path.display()))?
            } else {
                warn!(path = %path.display(), "no config file found; using defaults");
                AppConfig::default()
            }
        }
    };
    config.apply_env_overrides();
    config.validate().context("invalid configuration")?;
    info!(api_base_url = %config.api_base_url, "configuration loaded");
    Ok(config)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}

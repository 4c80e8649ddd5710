mod console;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use {
    clap::{Parser, Subcommand},
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    burrow_client::{SessionSink, Transport, run_network},
    burrow_common::Session,
    burrow_core::{Bot, PluginSet},
};

#[derive(Parser)]
#[command(name = "burrow", about = "burrow — a pluggable chat bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Config file path (overrides discovery).
    #[arg(long, global = true, env = "BURROW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the configured networks (default when no
    /// subcommand is provided).
    Run,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented starter config.
    Init {
        /// Destination (defaults to ~/.config/burrow/burrow.toml).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Print the effective config as TOML.
    Show,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_ansi(true),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    match cli.command {
        None | Some(Commands::Run) => run(cli.config.as_deref()).await,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { path } => {
                let path = path.unwrap_or_else(burrow_config::default_config_path);
                burrow_config::write_example(&path)?;
                println!("wrote {}", path.display());
                Ok(())
            },
            ConfigAction::Show => {
                let cfg = burrow_config::discover_and_load(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg)?);
                Ok(())
            },
        },
    }
}

async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "burrow starting");
    let cfg = burrow_config::discover_and_load(config_path)?;

    let mut factories = PluginSet::new();
    burrow_plugins::register_defaults(&mut factories);

    let shutdown = CancellationToken::new();
    let mut bots = Vec::new();
    let mut sessions = Vec::new();

    for (name, network) in &cfg.networks {
        let transport: Arc<dyn Transport> = match network.transport.as_str() {
            "console" => Arc::new(console::ConsoleTransport::new()),
            other => {
                warn!(network = %name, transport = %other, "unknown transport kind, skipping network");
                continue;
            },
        };

        let sink = SessionSink::new();
        let session = Session::new(
            name.clone(),
            network.nick.clone(),
            cfg.prefix_for(network),
            cfg.admins_for(network),
            sink.clone(),
        );
        let bot = Bot::new(session, factories.clone(), cfg.plugins_for(network));
        bot.load().await;

        sessions.push(tokio::spawn(run_network(
            transport,
            Arc::clone(&bot),
            sink,
            cfg.reconnect_delay(),
            shutdown.clone(),
        )));
        bots.push(bot);
    }

    if bots.is_empty() {
        anyhow::bail!("no usable networks configured, check the [networks] tables");
    }

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    shutdown.cancel();
    for session in sessions {
        let _ = session.await;
    }
    for bot in bots {
        bot.shutdown().await;
    }
    Ok(())
}

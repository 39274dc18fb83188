//! helpdesk CLI: Terminal front end for the helpdesk support widget

use clap::{Parser, Subcommand};
use helpdesk_engine::{HttpTransport, TurnOutcome, WidgetConfig};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Customer support chat widget for the terminal
#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file
    #[arg(long, global = true, default_value = "helpdesk.json")]
    config: PathBuf,

    /// Assistant service base URL (overrides config and HELPDESK_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the widget (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Ask {
        /// Message text (words are joined with spaces)
        #[arg(required = true)]
        message: Vec<String>,

        /// Continue an existing conversation
        #[arg(long)]
        session: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the assistant service is up
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init,
}

fn main() {
    let cli = Cli::parse();

    let is_tui = matches!(cli.command, None | Some(Commands::Tui));
    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref(), is_tui) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    match cli.command {
        None | Some(Commands::Tui) => {
            let config = load_config(&cli.config, cli.base_url);
            let rt = runtime();
            if let Err(e) = rt.block_on(helpdesk_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Ask {
            message,
            session,
            json,
        }) => {
            let config = load_config(&cli.config, cli.base_url);
            runtime().block_on(cmd_ask(&config, &message.join(" "), session, json));
        }
        Some(Commands::Health { json }) => {
            let config = load_config(&cli.config, cli.base_url);
            runtime().block_on(cmd_health(&config, json));
        }
        Some(Commands::Init) => {
            cmd_init(&cli.config, cli.base_url);
        }
    }
}

/// Install the global subscriber.
///
/// One-shot commands log to stderr. The TUI owns the terminal, so it only
/// logs when a file is given.
fn init_logging(verbose: bool, log_file: Option<&Path>, is_tui: bool) -> std::io::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true),
                )
                .init();
        }
        None if is_tui => {}
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .init();
        }
    }
    Ok(())
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    }
}

fn load_config(path: &Path, base_url: Option<String>) -> WidgetConfig {
    let mut config = match WidgetConfig::load_or_default(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    config
}

async fn cmd_ask(config: &WidgetConfig, message: &str, session: Option<String>, json: bool) {
    let mut controller = match helpdesk_engine::connect(config) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Failed to set up client: {e}");
            std::process::exit(1);
        }
    };
    if let Some(session) = session {
        controller.resume_session(session);
    }

    controller.update_draft(message);
    let Some(outcome) = controller.submit().await else {
        eprintln!("Nothing to send");
        std::process::exit(1);
    };

    let state = controller.state();
    let Some(reply) = state.messages().last() else {
        eprintln!("No reply recorded");
        std::process::exit(1);
    };

    if json {
        let failure = controller.diagnostics().last();
        let output = serde_json::json!({
            "reply": reply.content,
            "timestamp": reply.timestamp,
            "session_id": state.session_id(),
            "failure": failure,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize reply: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", reply.content);
        if let Some(session_id) = state.session_id() {
            eprintln!("session: {session_id}");
        }
    }

    if let TurnOutcome::FellBack(kind) = outcome {
        if !json {
            eprintln!("Request failed ({kind})");
        }
        std::process::exit(1);
    }
}

async fn cmd_health(config: &WidgetConfig, json: bool) {
    let transport = match HttpTransport::new(config) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Failed to set up client: {e}");
            std::process::exit(1);
        }
    };

    match transport.health().await {
        Ok(health) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "url": config.health_url(),
                        "status": health.status,
                        "service": health.service,
                    })
                );
            } else {
                println!("{} {}", health.status, health.service);
            }
            if !health.is_healthy() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "url": config.health_url(),
                        "error": e.to_string(),
                        "kind": e.kind().to_string(),
                    })
                );
            } else {
                eprintln!("{} unreachable: {e}", config.health_url());
            }
            std::process::exit(1);
        }
    }
}

fn cmd_init(path: &Path, base_url: Option<String>) {
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return;
    }

    let mut config = WidgetConfig::default();
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }

    match config.save(path) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

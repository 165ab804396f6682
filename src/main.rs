use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use switchboard_core::{
    config::{self, Config, SwitchboardConfig},
    traits::ConfigSource,
};
use switchboard_providers::{http::ReqwestTransport, status};
use switchboard_router::{classify, Dispatcher};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "switchboard",
    version,
    about = "Switchboard: route chat messages to external APIs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message through the router.
    Ask {
        /// User id used for rate limits, context and voice preference.
        #[arg(short, long, default_value = "cli")]
        user: String,
        /// Write the voice reply here when one is produced.
        #[arg(long)]
        audio_out: Option<PathBuf>,
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Read messages from stdin, one per line.
    Repl {
        #[arg(short, long, default_value = "cli")]
        user: String,
    },
    /// Show the intent a message would be routed to.
    Classify {
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Check reachability of every enabled provider.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    init_tracing(&cfg.switchboard);

    match cli.command {
        Commands::Ask {
            user,
            audio_out,
            message,
        } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: switchboard ask <message>");
            }
            let dispatcher = build_dispatcher(cfg);
            let reply = dispatcher.handle_message(&user, &message.join(" ")).await;
            println!("{}", reply.text_response);

            if let Some(audio) = reply.audio_response {
                match audio_out {
                    Some(path) => {
                        std::fs::write(&path, &audio)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        eprintln!("voice reply written to {}", path.display());
                    }
                    None => eprintln!(
                        "voice reply ({} bytes) dropped; pass --audio-out to keep it",
                        audio.len()
                    ),
                }
            }
        }
        Commands::Repl { user } => {
            let name = cfg.switchboard.name.clone();
            let dispatcher = build_dispatcher(cfg);
            repl(&dispatcher, &name, &user).await?;
        }
        Commands::Classify { message } => {
            let result = classify(&message.join(" "));
            println!(
                "intent: {} (confidence {:.2})",
                result.intent, result.confidence
            );
        }
        Commands::Status => {
            println!("{} - Status Check\n", cfg.switchboard.name);
            println!("Config: {}", cli.config);
            let enabled = cfg.enabled_providers();
            if enabled.is_empty() {
                println!("No providers enabled.");
                return Ok(());
            }
            println!();
            let transport = ReqwestTransport::new();
            for st in status::check_all(&cfg, &transport).await {
                println!(
                    "  {:<20} {:<8} {}",
                    st.name,
                    st.health.to_string(),
                    st.endpoint
                );
            }
        }
    }

    Ok(())
}

/// Install the stderr subscriber, plus a daily log file when `log_dir` is set.
fn init_tracing(cfg: &SwitchboardConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    let file_layer = (!cfg.log_dir.is_empty()).then(|| {
        let dir = config::shellexpand(&cfg.log_dir);
        let _ = std::fs::create_dir_all(&dir);
        let appender = tracing_appender::rolling::daily(dir, "switchboard.log");
        tracing_subscriber::fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .ok();
}

fn build_dispatcher(cfg: Config) -> Dispatcher {
    info!(
        "{} ready with {} providers enabled",
        cfg.switchboard.name,
        cfg.enabled_providers().len()
    );
    Dispatcher::from_config(cfg, Arc::new(ReqwestTransport::new()))
}

async fn repl(dispatcher: &Dispatcher, name: &str, user: &str) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{name} - type a message, /help for commands, exit to quit.");
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        let reply = dispatcher.handle_message(user, line).await;
        println!("{}\n", reply.text_response);
        if let Some(audio) = reply.audio_response {
            println!("(voice reply: {} bytes)\n", audio.len());
        }
    }
    Ok(())
}

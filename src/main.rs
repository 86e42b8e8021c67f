//! Terminal chat client.
//!
//! Sends each entered line to the chat backend and prints the reply as it
//! streams in.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session against a local backend
//! chat-client --base-url http://localhost:8080
//!
//! # One message, then exit
//! chat-client config/client.toml --message "Bonjour"
//!
//! # Offline demo
//! CHAT_TRANSPORT=mock chat-client
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use streaming_chat_client::{
    chat::{SendOutcome, StreamingChatClient, TerminalDisplay},
    config::{Config, LoggingConfig},
    message::ChatRequest,
    transport::create_transport,
};

const PROMPT: &str = "> ";

/// Streaming chat client.
#[derive(Parser, Debug)]
#[command(name = "chat-client")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML).
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override backend base URL.
    #[arg(short = 'u', long)]
    base_url: Option<String>,

    /// Override transport (http, mock).
    #[arg(short, long)]
    transport: Option<String>,

    /// Send one message and exit.
    #[arg(short, long)]
    message: Option<String>,

    /// With --message, use the non-streaming endpoint.
    #[arg(long, requires = "message")]
    no_stream: bool,

    /// Check backend health and exit.
    #[arg(long, conflicts_with = "message")]
    health: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_ref())?;

    // Apply CLI overrides
    if let Some(base_url) = args.base_url {
        config.client.base_url = base_url;
    }
    if let Some(transport) = args.transport {
        config.client.transport = transport;
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    init_logging(&config.logging)?;

    let transport = create_transport(&config.client)?;
    tracing::info!(
        transport = transport.name(),
        endpoint = %config.client.stream_url(),
        "Chat client started"
    );

    if args.health {
        return match transport.health_check().await {
            Ok(status) => {
                println!("{}", status.trim());
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("unhealthy: {}", e);
                Ok(ExitCode::FAILURE)
            }
        };
    }

    if let Some(message) = args.message {
        if args.no_stream {
            let message = message.trim();
            if message.is_empty() {
                return Ok(ExitCode::SUCCESS);
            }
            return match transport.complete(&ChatRequest::user(message)).await {
                Ok(reply) => {
                    println!("{}: {}", config.ui.bot_label, reply.text);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Chat exchange failed");
                    println!("{}: {}", config.ui.bot_label, config.ui.error_message);
                    Ok(ExitCode::FAILURE)
                }
            };
        }

        let display = TerminalDisplay::new(std::io::stdout(), config.ui.clone());
        let mut client = StreamingChatClient::new(transport, display, &config.ui);
        return Ok(match client.send_message(&message).await {
            SendOutcome::Failed(_) => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        });
    }

    let display = TerminalDisplay::new(std::io::stdout(), config.ui.clone())
        .echo_user(false)
        .with_prompt(PROMPT);
    let mut client = StreamingChatClient::new(transport, display, &config.ui);

    print_prompt();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line else {
            // EOF
            break;
        };

        tokio::select! {
            outcome = client.send_message(&line) => {
                if matches!(outcome, SendOutcome::Ignored) {
                    print_prompt();
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!();
    tracing::info!("Chat client stopped");
    Ok(ExitCode::SUCCESS)
}

fn print_prompt() {
    print!("{}", PROMPT);
    if let Err(e) = std::io::stdout().flush() {
        tracing::debug!(error = %e, "stdout flush failed");
    }
}

/// Initialize logging with tracing. Logs go to stderr, away from the transcript.
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

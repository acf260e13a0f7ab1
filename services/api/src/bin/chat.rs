//! services/api/src/bin/chat.rs
//!
//! A terminal chat session against a running API server. Each line typed is one
//! question; an empty line is ignored and `/quit` or end of input ends the session.

use api_lib::adapters::ProxyTransport;
use coursehub_core::domain::ChatMessage;
use coursehub_core::session::ChatSession;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_API_URL: &str = "http://localhost:3000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn print_message(message: &ChatMessage) {
    println!("\nassistant> {}", message.text);
    if message.is_partial {
        println!("  (the answer was cut short)");
    }
    if message.is_error {
        println!("  (the server could not be reached, this is an offline answer)");
    }
    if !message.suggestions.is_empty() {
        println!("  try: {}", message.suggestions.join(" | "));
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api_url = std::env::var("CHAT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    info!(%api_url, "Starting chat session");

    let transport = ProxyTransport::new(&api_url, REQUEST_TIMEOUT)?;
    let mut session = ChatSession::new(transport);
    for message in session.transcript() {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        if let Some(reply) = session.submit(&line).await {
            print_message(reply);
        }
    }

    Ok(())
}

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Gmail gateway: HTTP server and read-only CLI

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use gmail_gateway::routes::{AppState, router};
use gmail_gateway::{EmailSummary, GmailClient, GmailConfig, MessageFormat, ServerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gmail-gateway")]
#[command(about = "Read-only HTTP gateway and CLI for Gmail")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List recent emails
    List {
        /// Mailbox to read
        #[arg(long, default_value = "me")]
        user: String,

        /// Maximum number of emails to show
        #[arg(long, default_value = "10")]
        limit: u32,

        /// Gmail search query (e.g. "is:unread")
        #[arg(long)]
        query: Option<String>,
    },

    /// Show a single email by id
    Show {
        /// Message id
        id: String,

        /// Mailbox to read
        #[arg(long, default_value = "me")]
        user: String,

        /// Provider format to request (metadata or full)
        #[arg(long, default_value = "full")]
        format: MessageFormat,
    },

    /// Search emails using a Gmail query
    Search {
        /// Gmail search query (e.g. "from:alice@example.com")
        query: String,

        /// Mailbox to read
        #[arg(long, default_value = "me")]
        user: String,

        /// Maximum number of results
        #[arg(long, default_value = "10")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match &args.command {
        Command::Serve { host, port } => serve(host.clone(), *port).await,
        Command::List { user, limit, query } => {
            let client = client_from_env()?;
            let emails = client.list_recent(user, *limit, query.as_deref()).await?;
            print_emails(&args, &emails)
        }
        Command::Show { id, user, format } => {
            let client = client_from_env()?;
            let email = client.get_message(user, id, *format).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&email)?);
            } else {
                print_email_detail(&email);
            }
            Ok(())
        }
        Command::Search { query, user, limit } => {
            let client = client_from_env()?;
            let emails = client.search(user, *limit, Some(query.as_str())).await?;
            print_emails(&args, &emails)
        }
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut server = ServerConfig::from_env()?;
    if let Some(host) = host {
        server.host = host;
    }
    if let Some(port) = port {
        server.port = port;
    }

    let gmail = match GmailConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to initialize Gmail service: {e}");
            None
        }
    };

    let app = router(AppState::new(gmail));
    let addr = server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let term = async {
        if let Ok(mut s) = signal::unix::signal(signal::unix::SignalKind::terminate()) {
            s.recv().await;
        }
    };
    #[cfg(not(unix))]
    let term = std::future::pending::<()>();
    tokio::select! { () = ctrl_c => {}, () = term => {} }
}

fn client_from_env() -> anyhow::Result<GmailClient> {
    let config = GmailConfig::from_env()?.context("GMAIL_CREDENTIALS_PATH not set")?;
    Ok(GmailClient::new(config))
}

fn print_emails(args: &Args, emails: &[EmailSummary]) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(emails)?);
    } else {
        print_email_table(emails);
    }
    Ok(())
}

fn print_email_table(emails: &[EmailSummary]) {
    if emails.is_empty() {
        println!("No emails found.");
        return;
    }

    let header = format!(
        "{:<18} {:<17} {:<30} {}",
        "ID", "Date", "From", "Subject"
    );
    println!("{header}");
    println!("{}", "-".repeat(100));

    for email in emails {
        println!(
            "{:<18} {:<17} {:<30} {}",
            truncate(&email.id, 18),
            format_date(email.received_at_epoch_millis, "%Y-%m-%d %H:%M"),
            truncate(&email.from, 28),
            truncate(&email.subject, 40),
        );
    }

    println!("\n{} email(s)", emails.len());
}

fn print_email_detail(email: &EmailSummary) {
    println!("ID:      {}", email.id);
    println!("Thread:  {}", email.thread_id);
    println!(
        "Date:    {}",
        format_date(email.received_at_epoch_millis, "%Y-%m-%d %H:%M:%S")
    );
    println!("From:    {}", email.from);
    println!("Subject: {}", email.subject);

    if !email.snippet.is_empty() {
        println!("\n{}", email.snippet);
    }
}

fn format_date(millis: i64, fmt: &str) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map_or_else(|| "-".to_string(), |d| d.format(fmt).to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

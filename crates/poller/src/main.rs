use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use homework_common::config::AppConfig;
use homework_notifier::{Notifier, TelegramSender};
use homework_poller::{PollCycle, PracticumClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Homework poller starting...");

    // Missing credentials are fatal before anything touches the network
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(critical = true, error = %e, "Startup check failed, exiting");
            std::process::exit(1);
        }
    };

    let mut http = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout {
        http = http.timeout(timeout);
    }
    let http = http.build()?;

    let source = PracticumClient::from_config(http.clone(), &config);
    let notifier = Notifier::new(TelegramSender::from_config(http, &config));
    let cursor = config.initial_cursor(chrono::Utc::now());

    let mut cycle = PollCycle::new(source, notifier, cursor, config.retry_period);

    tokio::select! {
        _ = cycle.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping...");
        }
    }

    tracing::info!("Homework poller stopped.");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "homework_poller=debug,homework_notifier=debug,homework_engine=debug".into()
    });
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");

    // Optional log file, written in addition to stdout
    let log_file = std::env::var("LOG_FILE").ok();
    let (writer, open_error) = match log_writer(log_file.as_deref()) {
        Ok(writer) => (writer, None),
        Err(e) => (BoxMakeWriter::new(std::io::stdout), Some(e)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(log_file.is_none())
        .with_writer(writer);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    if let Some(e) = open_error {
        tracing::warn!(path = ?log_file, error = %e, "Cannot open log file, logging to stdout only");
    }
}

/// Stdout, teed into `path` (appending) when one is given.
fn log_writer(path: Option<&str>) -> std::io::Result<BoxMakeWriter> {
    match path {
        None => Ok(BoxMakeWriter::new(std::io::stdout)),
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(BoxMakeWriter::new(std::io::stdout.and(Mutex::new(file))))
        }
    }
}

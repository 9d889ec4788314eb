use chrono::Utc;
use dotenvy::dotenv;
use practicum_watcher::api::ApiClient;
use practicum_watcher::config::{get_log_dir, Settings};
use practicum_watcher::notify::TelegramNotifier;
use practicum_watcher::watcher::Watcher;
use regex::Regex;
use std::io::{self, Write};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Regex patterns for redacting credentials from log output
struct RedactionPatterns {
    bot_token: Regex,
    oauth_header: Regex,
    env_token: Regex,
}

impl RedactionPatterns {
    /// Initialize all regex patterns
    ///
    /// # Errors
    ///
    /// Returns an error if any regex pattern is invalid
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            bot_token: Regex::new(r"[0-9]{8,10}:[A-Za-z0-9_-]{35}")?,
            oauth_header: Regex::new(r"(OAuth )[A-Za-z0-9._-]+")?,
            env_token: Regex::new(r"(PRACTICUM_TOKEN|TELEGRAM_TOKEN)=[^\s&]+")?,
        })
    }

    fn redact(&self, input: &str) -> String {
        let mut output = input.to_string();
        output = self
            .bot_token
            .replace_all(&output, "[TELEGRAM_TOKEN]")
            .to_string();
        output = self
            .oauth_header
            .replace_all(&output, "$1[PRACTICUM_TOKEN]")
            .to_string();
        output = self
            .env_token
            .replace_all(&output, "$1=[MASKED]")
            .to_string();
        output
    }
}

struct RedactingWriter<W: Write> {
    inner: W,
    patterns: Arc<RedactionPatterns>,
}

impl<W: Write> RedactingWriter<W> {
    const fn new(inner: W, patterns: Arc<RedactionPatterns>) -> Self {
        Self { inner, patterns }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let redacted = self.patterns.redact(&s);
        self.inner.write_all(redacted.as_bytes())?;
        // We return the original buffer length to satisfy the contract,
        // even if the redacted string length differs.
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter<F> {
    make_inner: F,
    patterns: Arc<RedactionPatterns>,
}

impl<F> RedactingMakeWriter<F> {
    const fn new(make_inner: F, patterns: Arc<RedactionPatterns>) -> Self {
        Self {
            make_inner,
            patterns,
        }
    }
}

impl<'a, F, W> tracing_subscriber::fmt::MakeWriter<'a> for RedactingMakeWriter<F>
where
    F: Fn() -> W + 'static,
    W: Write,
{
    type Writer = RedactingWriter<W>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new((self.make_inner)(), self.patterns.clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Initialize redaction patterns early (before logging)
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    // Setup logging with redaction; the guard must outlive the loop
    let _guard = init_logging(patterns);

    info!("Starting practicum-watcher...");

    let settings = init_settings();

    let mut watcher = init_watcher(&settings);
    let shutdown = shutdown_token();

    watcher.run(shutdown).await;

    info!("practicum-watcher stopped.");
    Ok(())
}

fn init_logging(patterns: Arc<RedactionPatterns>) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(get_log_dir(), "practicum-watcher.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_writer = RedactingMakeWriter::new(io::stderr, patterns.clone());
    let file_writer = RedactingMakeWriter::new(move || file_writer.clone(), patterns);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stderr_writer))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    guard
}

fn init_settings() -> Settings {
    let settings = match Settings::new() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Missing credentials are the one unrecoverable condition
    if let Err(e) = settings.check_tokens() {
        error!("{e}");
        std::process::exit(1);
    }

    info!("Configuration loaded successfully.");
    settings
}

fn init_watcher(settings: &Settings) -> Watcher {
    let chat_id = match settings.chat_id() {
        Ok(id) => ChatId(id),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(settings.telegram_token.clone());
    let notifier = TelegramNotifier::new(bot, chat_id);
    let api = ApiClient::new(settings);
    let cursor = Utc::now().timestamp();

    Watcher::new(api, Box::new(notifier), cursor)
}

fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down...");
            handle.cancel();
        }
    });
    token
}

use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::Level;
use tracing::{debug, info, metadata::LevelFilter, trace};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{prelude::*, EnvFilter};

/// The name of the log file(s) within the log directory.
/// The rolling appender suffixes it with the date.
pub const LOG_FILE_NAME: &str = "user-content-panel.log";

/// Where and how much to log.
#[derive(Debug, Clone, Default)]
pub struct Logging {
    /// Log to stdout at this level, if any.
    /// Frontends drawing on the terminal should leave this out.
    pub stdout: Option<Level>,

    /// Log to a daily rolling file in this directory at this level, if any.
    pub file: Option<(Level, PathBuf)>,
}

impl Logging {
    /// Log to stdout only.
    pub fn stdout(level: Level) -> Self {
        Self {
            stdout: Some(level),
            file: None,
        }
    }

    /// Also log to files in the given directory.
    pub fn with_file(mut self, level: Level, directory: PathBuf) -> Self {
        self.file = Some((level, directory));
        self
    }
}

fn stdout_filter(level: Level) -> EnvFilter {
    // `RUST_LOG` wins if set, so that dependencies can be silenced or debugged.
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(LevelFilter::from(level).to_string()))
}

fn do_init(logging: Logging) {
    let mut message = String::from("Logging with:");

    let maybe_stdout_layer = logging.stdout.map(|level| {
        message += " stdout";

        tracing_subscriber::fmt::layer().with_filter(stdout_filter(level))
    });

    let maybe_file_layer = logging.file.map(|(level, output_dir)| {
        message += &format!(" file (in dir {output_dir:?})");

        let file_appender = RollingFileAppender::new(Rotation::DAILY, output_dir, LOG_FILE_NAME);

        tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_filter(LevelFilter::from(level))
    });

    tracing_subscriber::registry()
        .with(maybe_stdout_layer)
        .with(maybe_file_layer)
        .init();

    debug!(message);
}

/// Initialize tracing.
///
/// Will only initialize once, so tests may call this.
pub async fn init(logging: Logging) {
    static TRACING_IS_INITIALIZED: RwLock<bool> = RwLock::const_new(false);

    let initialized = { *TRACING_IS_INITIALIZED.read().await };

    if !initialized {
        let mut initialized = TRACING_IS_INITIALIZED.write().await;

        // To avoid race condition between the `.read()` and the
        // `.write()`.
        if *initialized {
            return;
        }

        do_init(logging);

        *initialized = true;
    }

    info!("Logging initialized");
}

/// Mark the end of the log.
pub fn shutdown() {
    trace!("Shutting down");
}

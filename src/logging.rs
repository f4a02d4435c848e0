use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILE: &str = "graphrest.log";

/// Filter used when `RUST_LOG` is unset.
///
/// The gateway's own events follow `verbose`. axum reports request
/// rejections at debug, so it is only opened up in verbose mode; the
/// HTTP client and TLS stacks stay at warn either way.
pub fn default_directives(verbose: bool) -> String {
    let (own, server) = if verbose {
        ("debug", "debug")
    } else {
        ("info", "warn")
    };
    format!("graphrest={own},axum={server},hyper=warn,reqwest=warn,rustls=warn")
}

/// Directory and file name for the daily rolling appender.
fn split_log_path(log_path: &Path) -> (&Path, &OsStr) {
    let dir = log_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file = log_path
        .file_name()
        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
    (dir, file)
}

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable verbose (DEBUG) logging
/// * `log_file` - Optional path to log file. If None, logs only to stderr
pub fn init(verbose: bool, log_file: Option<PathBuf>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    let Some(log_path) = log_file else {
        subscriber.init();
        return;
    };

    let (dir, file) = split_log_path(&log_path);
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Cannot create log directory {}: {}", dir.display(), e);
    }
    let file_appender = tracing_appender::rolling::daily(dir, file);

    // Route and diagnostic events carry structured fields; flatten them
    // so `kind`, `subject` and `path` sit at the top level of each line.
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json()
        .flatten_event(true)
        .with_current_span(false);

    subscriber.with(file_layer).init();
}

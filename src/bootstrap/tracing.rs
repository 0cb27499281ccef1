//! Tracing configuration for HobbyApp
//!
//! - Filter: `RUST_LOG` when set, otherwise the defaults from
//!   [`build_filter_directives`]
//! - Output: stderr, keeping stdout for command output, plus
//!   `<data root>/logs/hobbyapp.log` when the log directory can be created

use std::path::Path;
use std::{fs, io, sync::OnceLock};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

pub const LOG_DIR_NAME: &str = "logs";
pub const LOG_FILE_NAME: &str = "hobbyapp.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives.
///
/// Development builds log the workspace crates at debug; HTTP client
/// internals stay at warn either way.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let crate_level = if is_dev { "debug" } else { "info" };
    vec![
        "info".to_string(),
        "hyper=warn".to_string(),
        "reqwest=warn".to_string(),
        format!("hobbyapp={crate_level}"),
        format!("hb_app={crate_level}"),
        format!("hb_infra={crate_level}"),
    ]
}

/// Install the global subscriber.
///
/// Call once, before any other logging. Failure to open the log file is
/// reported and logging continues on stderr only.
///
/// # Errors
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber(data_root: Option<&Path>) -> anyhow::Result<()> {
    let filter_directives = build_filter_directives(is_development());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives.join(",")));

    let console_writer: BoxMakeWriter = BoxMakeWriter::new(io::stderr);
    let file_writer = match data_root.map(build_file_writer) {
        Some(Ok(writer)) => Some(writer),
        Some(Err(err)) => {
            eprintln!("Failed to initialize file logging, falling back to stderr: {err}");
            None
        }
        None => None,
    };

    let console_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(console_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    let subscriber = registry().with(env_filter).with(console_layer);

    if let Some(layer) = file_layer {
        subscriber.with(layer).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}

fn build_file_writer(data_root: &Path) -> anyhow::Result<NonBlocking> {
    let logs_dir = data_root.join(LOG_DIR_NAME);
    fs::create_dir_all(&logs_dir)?;

    let file_appender = tracing_appender::rolling::never(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file. Unset means log to stderr.
pub const LOG_FILE_ENV: &str = "GESTURE_CATALOG_LOG";

/// Initialize tracing.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Output goes to
/// stderr unless `GESTURE_CATALOG_LOG` names a file; that file is created
/// as `{path}.{pid}` so concurrent runs don't interleave.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_path) = std::env::var(LOG_FILE_ENV).ok() else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_timer(UtcTime::rfc_3339())
            .try_init();
        return;
    };

    let unique_path = format!("{}.{}", log_path, std::process::id());
    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: Failed to create log file: {}", unique_path);
        return;
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}

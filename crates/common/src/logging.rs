//! Logging and tracing initialization.

use std::fs::{File, OpenOptions};

use crate::config::LoggingConfig;

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. When a log file is
/// configured, output is appended there instead of stderr.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file, open_error) = match open_log_file(config) {
        Ok(file) => (file, None),
        Err(err) => (None, Some(err)),
    };

    match (config.json, file) {
        (true, Some(file)) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(std::sync::Mutex::new(file))
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (true, None) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .json()
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (false, Some(file)) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        (false, None) => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }

    if let (Some(path), Some(err)) = (&config.file, open_error) {
        tracing::warn!(
            path = %path.display(),
            error = %err,
            "Failed to open log file; logging to stderr"
        );
    }
}

/// Open the configured log file for appending. `Ok(None)` means no file is
/// configured.
fn open_log_file(config: &LoggingConfig) -> std::io::Result<Option<File>> {
    config
        .file
        .as_ref()
        .map(|path| OpenOptions::new().create(true).append(true).open(path))
        .transpose()
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_log_file_configured() {
        assert!(open_log_file(&LoggingConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_unopenable_log_file_is_reported() {
        let config = LoggingConfig {
            file: Some("/definitely/not/a/dir/swingtrace.log".into()),
            ..LoggingConfig::default()
        };
        assert!(open_log_file(&config).is_err());
    }

    #[test]
    fn test_log_file_is_created() {
        let path = std::env::temp_dir().join(format!("swingtrace_log_{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let config = LoggingConfig {
            file: Some(path.clone()),
            ..LoggingConfig::default()
        };
        assert!(open_log_file(&config).unwrap().is_some());
        assert!(path.exists());
        std::fs::remove_file(path).unwrap();
    }
}

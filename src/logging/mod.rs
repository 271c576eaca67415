//! Tracing subscriber initialization.
//!
//! The TUI owns stdout, so logs go to a file. Follow them with `tail -f` in
//! a separate terminal; `RUST_LOG=chatscroll=trace` shows every height
//! correction and observer change.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no usable filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Split a log path into directory and file name, creating the directory.
///
/// A bare file name logs into the current directory.
pub fn prepare_log_file(log_path: &Path) -> Result<(PathBuf, String), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    Ok((directory, file_name.to_string()))
}

/// Initialize the tracing subscriber with file-based logging.
///
/// Respects `RUST_LOG`, defaulting to [`DEFAULT_FILTER`]. Creates the log
/// directory if it doesn't exist.
///
/// # Errors
/// Fails if the directory cannot be created, the path has no file name, or a
/// global subscriber is already installed.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let (directory, file_name) = prepare_log_file(log_path)?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Writer capturing formatted events in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn prepare_creates_missing_directory() {
        let test_dir = std::env::temp_dir().join("chatscroll_test_logs_create");
        let _ = fs::remove_dir_all(&test_dir);

        let (directory, file_name) = prepare_log_file(&test_dir.join("app.log")).unwrap();

        assert!(test_dir.exists(), "Log directory should be created");
        assert_eq!(directory, test_dir);
        assert_eq!(file_name, "app.log");
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    fn prepare_uses_current_directory_for_bare_file_name() {
        let (directory, file_name) = prepare_log_file(Path::new("bare.log")).unwrap();
        assert_eq!(directory, PathBuf::from("."));
        assert_eq!(file_name, "bare.log");
    }

    #[test]
    fn prepare_rejects_path_without_file_name() {
        let result = prepare_log_file(Path::new("/"));
        assert!(matches!(result, Err(LoggingError::InvalidPath(_))));
    }

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_even_if_subscriber_exists() {
        let test_dir = std::env::temp_dir().join("chatscroll_test_logs_init");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail with SubscriberAlreadySet when another test installed one.
        let _ = init(&test_dir.join("init.log"));

        assert!(test_dir.exists());
        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    fn core_debug_events_reach_the_subscriber() {
        use crate::view_state::{LineOffset, ScrollAnchorController};

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("chatscroll=debug"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut anchor = ScrollAnchorController::default();
            anchor.reconcile(100, 10);
            anchor.user_scroll_to(LineOffset::new(0), 100, 10);
        });

        let text = captured.text();
        assert!(text.contains("anchor mode changed"), "got: {text}");
        assert!(text.contains("UserScrolled"), "got: {text}");
    }
}

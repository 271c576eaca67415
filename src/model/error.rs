//! Error types for the chatscroll application.
//!
//! The list engine itself never fails: invalid inputs degrade (a zero-height
//! measurement is ignored, an unknown row resolves to a default). Errors only
//! exist at the impure shell, composed with `thiserror` and `?`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level application error
//!   - [`ConfigError`] - Config file reading or parsing failures
//!   - [`LoggingError`] - Log file setup failures
//!   - `std::io::Error` - Terminal/TUI failures

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Top-level application error encompassing all failure modes.
///
/// All variants are fatal: `main` restores the terminal and reports them on
/// stderr.
///
/// # Examples
///
/// ```no_run
/// use chatscroll::model::error::AppError;
/// use chatscroll::config::ConfigError;
///
/// fn run_app() -> Result<(), AppError> {
///     // ConfigError converts to AppError via From
///     load()?;
///     Ok(())
/// }
/// # fn load() -> Result<(), ConfigError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The log file could not be set up.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// Raw mode, alternate screen, event polling and drawing all surface here.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn io_error_converts_to_terminal() {
        let err: AppError = std::io::Error::other("broken pipe").into();
        assert!(matches!(err, AppError::Terminal(_)));
        assert_eq!(err.to_string(), "Terminal error: broken pipe");
    }

    #[test]
    fn config_error_converts_and_displays_path() {
        let err: AppError = ConfigError::ParseError {
            path: PathBuf::from("/tmp/config.toml"),
            reason: "expected `=`".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("/tmp/config.toml"));
    }
}

//! CLI error type.

use std::fmt;

use tilebound::config::ConfigError;
use tilebound::logging::LoggingError;
use tilebound::pass::PassError;
use tilebound::scene::SceneError;

/// Errors surfaced by CLI commands. Every variant exits non-zero.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or inconsistent command-line input.
    Config(String),

    /// Config file could not be read, written or validated.
    ConfigFile(ConfigError),

    /// Scene description could not be loaded.
    Scene(SceneError),

    /// An export pass failed.
    Pass(PassError),

    /// Some levels of detail could not be exported; the others were.
    PassesFailed(Vec<String>),

    /// Logging could not be initialized.
    Logging(LoggingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Scene(e) => write!(f, "Failed to load scene: {}", e),
            CliError::Pass(e) => write!(f, "Export failed: {}", e),
            CliError::PassesFailed(lods) => {
                write!(f, "Export failed for LOD(s): {}", lods.join(", "))
            }
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::ConfigFile(e) => Some(e),
            CliError::Scene(e) => Some(e),
            CliError::Pass(e) => Some(e),
            CliError::PassesFailed(_) => None,
            CliError::Logging(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<SceneError> for CliError {
    fn from(e: SceneError) -> Self {
        CliError::Scene(e)
    }
}

impl From<PassError> for CliError {
    fn from(e: PassError) -> Self {
        CliError::Pass(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_message_display() {
        let err = CliError::Config("no LOD given".to_string());
        assert_eq!(err.to_string(), "Configuration error: no LOD given");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_pass_error_keeps_source() {
        let err = CliError::from(PassError::CollectionCount { found: 3 });
        assert!(err.to_string().starts_with("Export failed: "));
        assert!(err.to_string().contains("found 3"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_passes_failed_lists_lods() {
        let err = CliError::PassesFailed(vec!["lod1".to_string(), "lod3".to_string()]);
        assert_eq!(err.to_string(), "Export failed for LOD(s): lod1, lod3");
    }

    #[test]
    fn test_config_file_error_display_is_unwrapped() {
        let err = CliError::from(ConfigError::UnknownKey("a.b".to_string()));
        assert_eq!(err.to_string(), "Unknown configuration key 'a.b'");
    }
}

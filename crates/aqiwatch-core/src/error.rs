//! Error type shared by the core operations.

use std::path::PathBuf;

/// Everything that can go wrong in `aqiwatch-core`.
///
/// `InvalidArgument` and `InvalidState` are programmer errors: a caller asked
/// for a zero-length window or advanced an empty one. They are returned rather
/// than panicking so renderers can report them and exit.
#[derive(Debug, thiserror::Error)]
pub enum AqiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, AqiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = AqiError::InvalidArgument("length must be at least 1".into());
        assert_eq!(err.to_string(), "invalid argument: length must be at least 1");

        let err = AqiError::InvalidState("window is empty".into());
        assert_eq!(err.to_string(), "invalid state: window is empty");
    }

    #[test]
    fn config_read_names_path() {
        let err = AqiError::ConfigRead {
            path: PathBuf::from("/nope/aqiwatch.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/aqiwatch.json"), "got: {msg}");
        assert!(msg.contains("missing"), "got: {msg}");
    }
}

//! Error type for the command line tool.

use std::path::PathBuf;

use songpat_patterns::PatternError;
use songpat_query::QueryError;
use thiserror::Error;

/// Errors raised while configuring or running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The pattern could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The query could not be parsed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The songs file could not be read.
    #[error("cannot read songs from {}: {source}", path.display())]
    ReadSongs {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The songs file is not an array of song objects.
    #[error("malformed songs in {}: {source}", path.display())]
    MalformedSongs {
        /// File holding the malformed document.
        path: PathBuf,
        /// Underlying decoding failure.
        source: serde_json::Error,
    },

    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_error_displays_message() {
        let error = CliError::InvalidConfig("unknown log level".to_string());
        assert_eq!(error.to_string(), "invalid configuration: unknown log level");
    }

    #[test]
    fn pattern_errors_pass_through() {
        let error = CliError::from(PatternError::Lexer { position: 3 });
        assert_eq!(
            error.to_string(),
            PatternError::Lexer { position: 3 }.to_string()
        );
    }

    #[test]
    fn read_errors_name_the_file() {
        let error = CliError::ReadSongs {
            path: PathBuf::from("library.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let message = error.to_string();
        assert!(message.contains("library.json"));
        assert!(message.contains("file not found"));
    }

    #[test]
    fn io_error_converts_from_std_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: CliError = io_err.into();
        assert!(error.to_string().contains("pipe closed"));
    }
}

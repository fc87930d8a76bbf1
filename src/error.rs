use thiserror::Error;

/// Main error type for Relvis
#[derive(Error, Debug)]
pub enum RelvisError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input document could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Remote document fetch errors
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using RelvisError
pub type Result<T> = std::result::Result<T, RelvisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelvisError::Config("Test error".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("Test error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let relvis_err: RelvisError = io_err.into();
        assert!(matches!(relvis_err, RelvisError::Io(_)));
    }
}

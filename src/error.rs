use thiserror::Error;

/// Main error type for fleetgraph
#[derive(Error, Debug)]
pub enum FleetGraphError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot text is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level section is absent or not an array
    #[error("Missing section: {0}")]
    MissingSection(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using FleetGraphError
pub type Result<T> = std::result::Result<T, FleetGraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FleetGraphError::MissingSection("endpoints".to_string());
        assert!(err.to_string().contains("Missing section"));
        assert!(err.to_string().contains("endpoints"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FleetGraphError = json_err.into();
        assert!(matches!(err, FleetGraphError::Json(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FleetGraphError = io_err.into();
        assert!(matches!(err, FleetGraphError::Io(_)));
    }
}

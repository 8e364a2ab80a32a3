use std::path::Path;

use thiserror::Error;

/// Errors surfaced by the estimator.
///
/// Rows that fail numeric coercion while loading the dataset are not
/// represented here; they are dropped and counted in `LoadStats`.
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// A dataset or model artifact is missing or unreadable. Fatal at startup.
    #[error("Failed to load {artifact} from '{source_path}': {message}")]
    Startup {
        artifact: &'static str,
        source_path: String,
        message: String,
    },

    /// The model column list cannot be turned into a feature schema.
    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    /// The encoded row does not line up with the columns the model expects.
    #[error("Feature columns don't match the model: {0}")]
    SchemaMismatch(String),

    /// A user-supplied value is outside its accepted range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EstimatorError {
    pub fn startup(artifact: &'static str, path: &Path, message: impl Into<String>) -> Self {
        Self::Startup {
            artifact,
            source_path: path.display().to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema(message.into())
    }

    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Whether this error should abort the process rather than a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Startup { .. } | Self::InvalidSchema(_))
    }
}

pub type Result<T> = std::result::Result<T, EstimatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_mentions_artifact_and_path() {
        let err = EstimatorError::startup("model", Path::new("rf_model.json"), "not found");
        let message = err.to_string();

        assert!(message.contains("model"));
        assert!(message.contains("rf_model.json"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_request_errors_are_not_fatal() {
        assert!(!EstimatorError::schema_mismatch("3 vs 4").is_fatal());
        assert!(!EstimatorError::invalid_input("bhk").is_fatal());
    }
}

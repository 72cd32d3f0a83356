use std::path::PathBuf;

/// Everything that can go wrong between loading artifacts and returning a price.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("failed to read artifact at {path}")]
    Config {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed artifact at {path}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact parsed but its shape does not fit the pipeline.
    #[error("incompatible artifact: {0}")]
    Artifact(String),

    /// Input outside the closed choices or widget bounds of the form.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl PricingError {
    /// True for request-time errors caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PricingError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;

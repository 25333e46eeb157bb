use std::io;
use thiserror::Error;

/// Result type for enhancement operations
pub type EnhanceResult<T> = Result<T, EnhanceError>;

/// Error taxonomy for the enhancement pipeline
#[derive(Error, Debug)]
pub enum EnhanceError {
    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Checkpoint missing, corrupt or incompatible with the architecture
    #[error("Model load error: {0}")]
    ModelLoadError(String),

    /// Requested compute device is not available
    #[error("Device error: {0}")]
    DeviceError(String),

    /// Input could not be read as audio
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Destination could not be created or written
    #[error("Write error: {0}")]
    WriteError(String),

    /// Batch or tensor shape violates its contract
    #[error("Shape error: {0}")]
    ShapeError(String),

    /// Resampling operation failed
    #[error("Resampling error: {0}")]
    ResamplingError(String),

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A post-processing worker died or the queue closed unexpectedly
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl EnhanceError {
    /// Startup-class errors abort the whole run; everything else is per item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EnhanceError::ModelLoadError(_)
                | EnhanceError::DeviceError(_)
                | EnhanceError::ConfigError(_)
        )
    }
}

impl From<serde_json::Error> for EnhanceError {
    fn from(err: serde_json::Error) -> Self {
        EnhanceError::ModelLoadError(format!("corrupt checkpoint: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(EnhanceError::ModelLoadError("x".into()).is_fatal());
        assert!(EnhanceError::DeviceError("x".into()).is_fatal());
        assert!(!EnhanceError::DecodeError("x".into()).is_fatal());
        assert!(!EnhanceError::WriteError("x".into()).is_fatal());
    }

    #[test]
    fn test_json_error_maps_to_model_load() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: EnhanceError = err.into();
        assert!(matches!(err, EnhanceError::ModelLoadError(_)));
    }
}

use thiserror::Error;

/// True system faults. Validation, concurrency, and integrity rejections
/// are first-class outcomes, not errors; only an unusable storage layer
/// surfaces here, and then nothing has been partially persisted.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage layer unavailable: {0}")]
    StorageUnavailable(&'static str),
}

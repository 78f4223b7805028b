use glam::UVec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkManagerError {
    #[error("Chunk manager is not initialized")]
    NotInitialized,
    #[error("Chunk manager is already initialized")]
    AlreadyInitialized,
    #[error("Invalid chunk manager configuration: {0}")]
    InvalidConfig(String),
    #[error("Chunk has size {actual}, expected {expected}")]
    InvalidChunkSize { expected: UVec3, actual: UVec3 },
    #[error("Failed to create worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a unit of background work produced no result.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
    #[error("Worker panicked: {message}")]
    Panicked { message: String },
    #[error("Worker pool was shut down before the job finished")]
    Abandoned,
    #[error("Chunk has size {actual}, expected {expected}")]
    InvalidChunk { expected: UVec3, actual: UVec3 },
}

impl WorkerError {
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            message.to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "unknown panic payload".to_string()
        };

        WorkerError::Panicked { message }
    }
}

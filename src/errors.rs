use batch_core::BatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de logging: {0}")]
    Logging(String),
    #[error("Error batch: {0}")]
    Batch(#[from] BatchError),
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Errores del motor batch.
//!
//! `BatchError` es la clasificación observable de un fallo: se guarda en
//! `JobExecution::failure` y `StepExecution::failure`, por eso es `Clone` y
//! serializable. Las etapas del pipeline (reader, processor, writer, tasklet)
//! devuelven `ItemError`; el driver del step lo envuelve con la posición del
//! chunk para diagnóstico.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum BatchError {
    #[error("job instance already completed: job={job_name} key={job_key}")]
    DuplicateRun { job_name: String, job_key: String },
    #[error("job execution already running: job={job_name} execution={execution_id}")]
    JobAlreadyRunning { job_name: String, execution_id: Uuid },
    #[error("component '{component}' requested outside of an active scope")]
    ScopeUnavailable { component: String },
    #[error("chunk write failed in step '{step}' (chunk #{chunk_index}, {item_count} items, position {position}): {message}")]
    ChunkWrite {
        step: String,
        chunk_index: usize,
        item_count: usize,
        position: u64,
        message: String,
    },
    #[error("reader failed in step '{step}' at position {position}: {message}")]
    Reader { step: String, position: u64, message: String },
    #[error("processor failed in step '{step}' at position {position}: {message}")]
    Processor { step: String, position: u64, message: String },
    #[error("tasklet failed in step '{step}': {message}")]
    Tasklet { step: String, message: String },
    #[error("invalid job parameters: {0}")]
    InvalidParameters(String),
    #[error("missing job parameter '{0}'")]
    MissingParameter(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("listener failed: {0}")]
    Listener(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl BatchError {
    /// Nombre corto de la variante (clasificación expuesta al caller).
    pub fn kind(&self) -> &'static str {
        match self {
            BatchError::DuplicateRun { .. } => "DuplicateRun",
            BatchError::JobAlreadyRunning { .. } => "JobAlreadyRunning",
            BatchError::ScopeUnavailable { .. } => "ScopeUnavailable",
            BatchError::ChunkWrite { .. } => "ChunkWrite",
            BatchError::Reader { .. } => "Reader",
            BatchError::Processor { .. } => "Processor",
            BatchError::Tasklet { .. } => "Tasklet",
            BatchError::InvalidParameters(_) => "InvalidParameters",
            BatchError::MissingParameter(_) => "MissingParameter",
            BatchError::InvalidConfiguration(_) => "InvalidConfiguration",
            BatchError::Listener(_) => "Listener",
            BatchError::Internal(_) => "Internal",
        }
    }
}

/// Error devuelto por readers, processors, writers y tasklets.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ItemError {
    #[error("{0}")]
    Failed(String),
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
}

impl ItemError {
    pub fn failed(message: impl Into<String>) -> Self {
        ItemError::Failed(message.into())
    }
}

impl From<std::io::Error> for ItemError {
    fn from(e: std::io::Error) -> Self {
        ItemError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ItemError {
    fn from(e: serde_json::Error) -> Self {
        ItemError::Parse(e.to_string())
    }
}

pub type ItemResult<T> = Result<T, ItemError>;

use thiserror::Error;

/// Error del dominio de socios y personas.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Error de validación: {0}")]
    ValidationError(String),

    #[error("Socio no encontrado: {0}")]
    NotFound(u64),

    #[error("Error de almacenamiento: {0}")]
    StorageError(String),

    #[error("Error de serialización: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::SerializationError(e.to_string())
    }
}

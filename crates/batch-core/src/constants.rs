//! Constantes del motor batch.

/// Nombre del parámetro identificador que generan los incrementers.
pub const RUN_ID_KEY: &str = "run.id";

/// Tamaño de chunk usado por los jobs de ejemplo cuando no se configura otro.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

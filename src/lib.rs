//! batchflow: binario que lanza los jobs de ejemplo del motor batch.
//!
//! - `config`: configuración desde `.env` y variables de entorno.
//! - `logging`: suscriptor `tracing` con puente para el facade `log`.
//! - `cli`: argumentos de línea de comandos y lanzamiento de un job.
//! - `errors`: errores de la aplicación.

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;

pub use cli::{execution_json, launch, Args};
pub use config::BatchConfig;
pub use errors::AppError;
pub use logging::LogFormat;

//! Inicialización de logs con `tracing-subscriber`.
//!
//! Los crates de librería escriben con el facade `log`; `LogTracer` reenvía
//! esos registros al suscriptor, así que un único filtro (`EnvFilter`)
//! gobierna ambos.

use tracing_subscriber::EnvFilter;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Texto: timestamp LEVEL target mensaje.
    #[default]
    Compact,
    /// Una línea JSON por evento.
    Json,
}

impl LogFormat {
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Filtro a partir de las directivas configuradas, silenciando crates de
/// terceros ruidosos salvo que las directivas digan otra cosa.
pub fn build_env_filter(directives: &str) -> Result<EnvFilter, AppError> {
    let mut all = vec!["clap=warn".to_string()];
    all.extend(directives.split(',').map(str::trim).filter(|d| !d.is_empty()).map(String::from));
    let filter = all.join(",");
    EnvFilter::try_new(&filter).map_err(|e| AppError::Logging(format!("filtro inválido '{filter}': {e}")))
}

/// Instala el suscriptor global. Falla si ya había uno instalado.
pub fn init_logging(directives: &str, format: LogFormat) -> Result<(), AppError> {
    let filter = build_env_filter(directives)?;

    // Puente `log` -> tracing para los crates de librería.
    tracing_log::LogTracer::init().map_err(|e| AppError::Logging(e.to_string()))?;

    let installed = match format {
        LogFormat::Compact => tracing_subscriber::fmt().with_env_filter(filter)
                                                       .with_target(true)
                                                       .compact()
                                                       .try_init(),
        LogFormat::Json => tracing_subscriber::fmt().json()
                                                    .with_env_filter(filter)
                                                    .with_target(true)
                                                    .try_init(),
    };
    installed.map_err(|e| AppError::Logging(e.to_string()))?;
    tracing::debug!("logging initialized: filter={directives} format={format:?}");
    Ok(())
}

//! Configuración de la aplicación.
//! Carga `.env` una sola vez y lee las variables `BATCH_*` con sus valores
//! por defecto.

use std::env;
use std::path::PathBuf;

use batch_adapters::CatalogSettings;
use batch_core::constants::DEFAULT_CHUNK_SIZE;
use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::AppError;
use crate::logging::LogFormat;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Tamaño de chunk de los jobs de ejemplo (`BATCH_CHUNK_SIZE`).
    pub chunk_size: usize,
    /// Directivas de filtrado de logs (`BATCH_LOG`), p. ej. `info,batch_core=debug`.
    pub log_filter: String,
    /// `compact` o `json` (`BATCH_LOG_FORMAT`).
    pub log_format: LogFormat,
    /// CSV por defecto de los jobs de personas (`BATCH_PERSON_FILE`).
    pub person_file: PathBuf,
    /// Cargar socios de muestra al arrancar (`BATCH_SEED_MEMBERS`).
    pub seed_members: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE,
               log_filter: "info".to_string(),
               log_format: LogFormat::Compact,
               person_file: PathBuf::from("data/person.csv"),
               seed_members: true }
    }
}

impl BatchConfig {
    pub fn from_env() -> Result<Self, AppError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let chunk_size = match lookup("BATCH_CHUNK_SIZE") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(AppError::Config(format!("BATCH_CHUNK_SIZE inválido: '{raw}'"))),
            },
            None => defaults.chunk_size,
        };
        let seed_members = match lookup("BATCH_SEED_MEMBERS") {
            Some(raw) => raw.trim()
                            .parse::<bool>()
                            .map_err(|_| AppError::Config(format!("BATCH_SEED_MEMBERS inválido: '{raw}'")))?,
            None => defaults.seed_members,
        };
        Ok(Self { chunk_size,
                  log_filter: lookup("BATCH_LOG").unwrap_or(defaults.log_filter),
                  log_format: lookup("BATCH_LOG_FORMAT").map(|f| LogFormat::from_name(&f))
                                                        .unwrap_or(defaults.log_format),
                  person_file: lookup("BATCH_PERSON_FILE").map(PathBuf::from).unwrap_or(defaults.person_file),
                  seed_members })
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings { chunk_size: self.chunk_size,
                          person_file: self.person_file.clone(),
                          seed_members: self.seed_members }
    }
}

//! Argumentos de línea de comandos y lanzamiento del job pedido.

use std::sync::Arc;

use batch_adapters::JobCatalog;
use batch_core::{InMemoryJobRepository, JobExecution, JobLauncher, JobParameters};
use clap::Parser;
use log::info;

use crate::config::BatchConfig;
use crate::errors::AppError;

#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
pub struct Args {
    /// Nombre del job a lanzar.
    #[arg(short, long)]
    pub job_name: Option<String>,
    /// Lista los jobs disponibles y termina.
    #[arg(short, long, default_value_t)]
    pub list: bool,
    /// Imprime la ejecución final como JSON por stdout.
    #[arg(long, default_value_t)]
    pub json: bool,
    /// Directivas de log; sustituye a `BATCH_LOG`.
    #[arg(long)]
    pub log: Option<String>,
    /// Parámetros del job: `name=value`, `name(long)=20`, `-name=value`
    /// (no identificador).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub params: Vec<String>,
}

/// Construye el catálogo, resuelve el job y lo ejecuta con un repositorio
/// en memoria nuevo.
///
/// Los rechazos del launcher (`DuplicateRun`, parámetros inválidos...) son
/// `Err`; un step fallido devuelve la ejecución en `FAILED`.
pub fn launch(args: &Args, config: &BatchConfig) -> Result<JobExecution, AppError> {
    let job_name = args.job_name
                       .as_deref()
                       .ok_or_else(|| AppError::Config("falta --job-name".into()))?;
    let parameters = JobParameters::from_args(&args.params)?;
    let catalog = JobCatalog::new(config.catalog_settings())?;
    let job = catalog.build(job_name)?;

    info!("launching {job_name} with {parameters}");
    let launcher = JobLauncher::new(Arc::new(InMemoryJobRepository::new()));
    Ok(launcher.run(&job, parameters)?)
}

/// Ejecución final en JSON legible (salida de `--json`).
pub fn execution_json(execution: &JobExecution) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(execution)?)
}

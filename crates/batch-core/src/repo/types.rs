//! Contrato de almacenamiento de registros de ejecución.
//!
//! Los registros se indexan por nombre de job + `job_key` (identidad de la
//! instancia) + ordinal de ejecución. El motor sólo necesita estas
//! operaciones; la durabilidad real es responsabilidad de la implementación.
use uuid::Uuid;

use crate::errors::BatchError;
use crate::model::{JobExecution, JobParameters, StepExecution};

pub trait JobRepository: Send + Sync {
    /// Resuelve o crea la `JobInstance` de (`job_name`, parámetros
    /// identificadores) y registra una nueva `JobExecution` en `Starting`.
    ///
    /// Debe ser atómico respecto a otros lanzamientos concurrentes:
    /// - última ejecución en curso -> `JobAlreadyRunning`
    /// - última ejecución `Completed` y `rerun_completed == false` ->
    ///   `DuplicateRun`
    /// - última ejecución `Failed`/`Stopped` -> reinicio: el contexto de job
    ///   de esa ejecución pasa a la nueva.
    fn create_job_execution(&self,
                            job_name: &str,
                            parameters: &JobParameters,
                            rerun_completed: bool)
                            -> Result<JobExecution, BatchError>;

    /// Persiste el estado actual de la ejecución (estado, contexto, steps).
    fn update_job_execution(&self, execution: &JobExecution);

    /// Inserta o actualiza una `StepExecution` (se llama en cada commit).
    fn update_step_execution(&self, step_execution: &StepExecution);

    /// Última `StepExecution` con ese nombre en cualquier ejecución de la
    /// instancia.
    fn last_step_execution(&self, instance_id: Uuid, step_name: &str) -> Option<StepExecution>;

    /// Parámetros del último lanzamiento de `job_name` (para incrementers).
    fn last_parameters(&self, job_name: &str) -> Option<JobParameters>;

    fn job_instance_count(&self, job_name: &str) -> usize;

    /// Todas las ejecuciones de una instancia, en orden de creación.
    fn job_executions(&self, instance_id: Uuid) -> Vec<JobExecution>;
}

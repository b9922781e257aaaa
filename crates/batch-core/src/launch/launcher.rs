use std::sync::Arc;

use log::info;

use crate::errors::BatchError;
use crate::job::Job;
use crate::model::{JobExecution, JobParameters};
use crate::repo::JobRepository;

/// Punto de entrada para lanzar jobs contra un `JobRepository`.
///
/// Los rechazos de lanzamiento (`DuplicateRun`, `JobAlreadyRunning`,
/// `InvalidParameters`) se devuelven como `Err`; un step que falla produce un
/// `Ok(JobExecution)` en estado `Failed`.
pub struct JobLauncher<R: JobRepository> {
    repository: Arc<R>,
}

impl<R: JobRepository> Clone for JobLauncher<R> {
    fn clone(&self) -> Self {
        Self { repository: Arc::clone(&self.repository) }
    }
}

impl<R: JobRepository> JobLauncher<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Parámetros efectivos del lanzamiento: los que derive el incrementer
    /// del job a partir del último lanzamiento, sobrescritos por los del
    /// caller.
    pub fn resolve_parameters(&self, job: &Job, parameters: JobParameters) -> Result<JobParameters, BatchError> {
        match job.incrementer() {
            Some(incrementer) => {
                let previous = self.repository.last_parameters(job.name());
                Ok(incrementer.get_next(previous.as_ref())?.merged_with(&parameters))
            }
            None => Ok(parameters),
        }
    }

    /// Registra una `JobExecution` en `Starting` sin ejecutarla todavía. Útil
    /// para obtener su `StopHandle` antes de `execute`.
    pub fn prepare(&self, job: &Job, parameters: JobParameters) -> Result<JobExecution, BatchError> {
        let parameters = self.resolve_parameters(job, parameters)?;
        job.validate_parameters(&parameters)?;
        let execution = self.repository
                            .create_job_execution(job.name(), &parameters, job.any_step_allows_start_if_complete())?;
        info!("job_launch job={} instance={} execution={} key={}",
              job.name(),
              execution.instance().id,
              execution.id(),
              execution.instance().job_key);
        Ok(execution)
    }

    /// Ejecuta una ejecución preparada hasta su estado terminal.
    pub fn execute(&self, job: &Job, mut execution: JobExecution) -> JobExecution {
        job.execute(&mut execution, self.repository.as_ref());
        execution
    }

    /// Lanza el job y bloquea hasta que termina.
    pub fn run(&self, job: &Job, parameters: JobParameters) -> Result<JobExecution, BatchError> {
        let execution = self.prepare(job, parameters)?;
        Ok(self.execute(job, execution))
    }
}

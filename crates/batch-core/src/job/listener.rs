use crate::errors::BatchError;
use crate::model::JobExecution;

/// Hooks alrededor de una ejecución de job.
///
/// `before_job` corre tras marcar la ejecución como `Started` y antes del
/// primer step; `after_job` corre tras fijar el estado terminal. Un error en
/// `after_job` se registra en el log y no altera el estado del job.
pub trait JobExecutionListener: Send + Sync {
    fn before_job(&self, _execution: &mut JobExecution) {}

    fn after_job(&self, _execution: &JobExecution) -> Result<(), BatchError> {
        Ok(())
    }
}

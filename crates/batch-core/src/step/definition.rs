use crate::errors::BatchError;
use crate::model::BatchStatus;
use crate::repo::JobRepository;

use super::StepContext;

/// Trait que define un Step dentro de un job.
///
/// Una definición es inmutable y puede compartirse entre runs; todo el estado
/// de una ejecución (componentes late-bound, contadores) vive en la pila de
/// `execute` y en la `StepExecution` del contexto.
pub trait Step: Send + Sync {
    /// Identificador estable y único dentro del job.
    fn name(&self) -> &str;

    /// Si el step se vuelve a ejecutar aunque ya haya completado en una
    /// ejecución anterior de la misma instancia.
    fn allow_start_if_complete(&self) -> bool {
        false
    }

    /// Ejecuta el step. Devuelve `Completed` o `Stopped`; cualquier error
    /// marca el step como `Failed`.
    fn execute(&self, ctx: &mut StepContext<'_>, repository: &dyn JobRepository) -> Result<BatchStatus, BatchError>;
}

use crate::bind::Scope;
use crate::model::{ExecutionContext, JobExecution, JobParameters, StepExecution};

/// Contexto entregado a un step durante su ejecución.
///
/// Une la `StepExecution` en curso con la `JobExecution` dueña: desde aquí se
/// alcanzan los parámetros del run, el contexto del step (privado) y el
/// contexto del job (compartido con los steps siguientes).
pub struct StepContext<'a> {
    step_execution: &'a mut StepExecution,
    job_execution: &'a mut JobExecution,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(step_execution: &'a mut StepExecution, job_execution: &'a mut JobExecution) -> Self {
        Self { step_execution,
               job_execution }
    }

    pub fn step_name(&self) -> &str {
        self.step_execution.step_name()
    }

    pub fn step_execution(&self) -> &StepExecution {
        &*self.step_execution
    }

    pub(crate) fn step_execution_mut(&mut self) -> &mut StepExecution {
        &mut *self.step_execution
    }

    pub fn job_execution(&self) -> &JobExecution {
        &*self.job_execution
    }

    pub fn job_parameters(&self) -> &JobParameters {
        self.job_execution.parameters()
    }

    /// Contexto con alcance de step.
    pub fn step_context(&self) -> &ExecutionContext {
        self.step_execution.execution_context()
    }

    pub fn step_context_mut(&mut self) -> &mut ExecutionContext {
        self.step_execution.execution_context_mut()
    }

    /// Contexto con alcance de job.
    pub fn job_context(&self) -> &ExecutionContext {
        self.job_execution.execution_context()
    }

    pub fn job_context_mut(&mut self) -> &mut ExecutionContext {
        self.job_execution.execution_context_mut()
    }

    pub fn is_stop_requested(&self) -> bool {
        self.job_execution.is_stop_requested()
    }

    /// Alcance de step para resolver componentes `LateBound`.
    pub fn scope(&self) -> Scope<'_> {
        Scope::Step(&*self.job_execution, &*self.step_execution)
    }

    /// Alcance de job (para steps construidos tarde).
    pub fn job_scope(&self) -> Scope<'_> {
        Scope::Job(&*self.job_execution)
    }
}

//! Driver de step basado en tasklet: un callback que se invoca repetidamente,
//! cada invocación en su propia transacción, hasta que devuelve
//! `RepeatStatus::Finished`.

use std::sync::Arc;

use log::{debug, warn};

use super::{ResourcelessTransactionManager, Step, StepContext, TransactionManager};
use crate::bind::{LateBound, ParameterBinder};
use crate::errors::{BatchError, ItemResult};
use crate::model::{BatchStatus, RepeatStatus, StepContribution};
use crate::repo::JobRepository;

/// Unidad de trabajo de un `TaskletStep`.
///
/// Los contadores que el tasklet registre en `contribution` se aplican a la
/// `StepExecution` sólo si la invocación confirma.
pub trait Tasklet {
    fn execute(&mut self, contribution: &mut StepContribution, ctx: &mut StepContext<'_>) -> ItemResult<RepeatStatus>;
}

/// Adaptador de closure a `Tasklet`.
pub struct FnTasklet<F>(F);

impl<F> Tasklet for FnTasklet<F>
    where F: FnMut(&mut StepContribution, &mut StepContext<'_>) -> ItemResult<RepeatStatus>
{
    fn execute(&mut self, contribution: &mut StepContribution, ctx: &mut StepContext<'_>) -> ItemResult<RepeatStatus> {
        (self.0)(contribution, ctx)
    }
}

/// Envuelve una closure como tasklet.
pub fn tasklet_fn<F>(f: F) -> FnTasklet<F>
    where F: FnMut(&mut StepContribution, &mut StepContext<'_>) -> ItemResult<RepeatStatus>
{
    FnTasklet(f)
}

pub struct TaskletStep {
    name: String,
    tasklet: LateBound<Box<dyn Tasklet>>,
    transaction_manager: Arc<dyn TransactionManager>,
    allow_start_if_complete: bool,
}

impl TaskletStep {
    pub fn builder(name: impl Into<String>) -> TaskletStepBuilder {
        TaskletStepBuilder { name: name.into(),
                             tasklet: None,
                             transaction_manager: Arc::new(ResourcelessTransactionManager),
                             allow_start_if_complete: false }
    }
}

pub struct TaskletStepBuilder {
    name: String,
    tasklet: Option<LateBound<Box<dyn Tasklet>>>,
    transaction_manager: Arc<dyn TransactionManager>,
    allow_start_if_complete: bool,
}

impl TaskletStepBuilder {
    /// Fábrica del tasklet (alcance de step).
    pub fn tasklet<T, F>(mut self, factory: F) -> Self
        where T: Tasklet + 'static,
              F: Fn(&ParameterBinder<'_>) -> Result<T, BatchError> + Send + Sync + 'static
    {
        self.tasklet = Some(LateBound::step(format!("{}.tasklet", self.name), move |b: &ParameterBinder<'_>| {
                                factory(b).map(|t| Box::new(t) as Box<dyn Tasklet>)
                            }));
        self
    }

    pub fn transaction_manager(mut self, transaction_manager: Arc<dyn TransactionManager>) -> Self {
        self.transaction_manager = transaction_manager;
        self
    }

    pub fn allow_start_if_complete(mut self, allow: bool) -> Self {
        self.allow_start_if_complete = allow;
        self
    }

    pub fn build(self) -> Result<TaskletStep, BatchError> {
        let tasklet = self.tasklet
                          .ok_or_else(|| BatchError::InvalidConfiguration(format!("step '{}': tasklet is required", self.name)))?;
        Ok(TaskletStep { name: self.name,
                         tasklet,
                         transaction_manager: self.transaction_manager,
                         allow_start_if_complete: self.allow_start_if_complete })
    }
}

impl Step for TaskletStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn allow_start_if_complete(&self) -> bool {
        self.allow_start_if_complete
    }

    fn execute(&self, ctx: &mut StepContext<'_>, repository: &dyn JobRepository) -> Result<BatchStatus, BatchError> {
        let mut tasklet = self.tasklet.resolve(&ctx.scope())?;
        let mut iteration = 0u64;
        loop {
            if ctx.is_stop_requested() {
                debug!("tasklet:stop step={} iterations={}", self.name, iteration);
                return Ok(BatchStatus::Stopped);
            }

            self.transaction_manager.begin().map_err(|e| BatchError::Internal(format!("begin transaction: {e}")))?;
            let saved = ctx.step_context().clone();
            let mut contribution = StepContribution::default();
            let outcome = tasklet.execute(&mut contribution, ctx)
                                 .and_then(|status| self.transaction_manager.commit().map(|_| status));
            let status = match outcome {
                Ok(status) => status,
                Err(e) => {
                    warn!("tasklet:failed step={} iteration={} err={}", self.name, iteration, e);
                    ctx.step_context_mut().clone_from(&saved);
                    self.transaction_manager.rollback();
                    ctx.step_execution_mut().increment_rollback_count();
                    return Err(BatchError::Tasklet { step: self.name.clone(),
                                                     message: e.to_string() });
                }
            };

            ctx.step_execution_mut().apply(&contribution, true);
            repository.update_step_execution(ctx.step_execution());
            iteration += 1;
            if !status.is_continuable() {
                debug!("tasklet:finished step={} iterations={}", self.name, iteration);
                return Ok(BatchStatus::Completed);
            }
        }
    }
}

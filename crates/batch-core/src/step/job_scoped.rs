use super::{Step, StepContext};
use crate::bind::{LateBound, ParameterBinder};
use crate::errors::BatchError;
use crate::model::BatchStatus;
use crate::repo::JobRepository;

/// Step cuya definición completa se construye al llegar el job a él, con los
/// parámetros del run en curso (alcance de job).
///
/// El nombre y `allow_start_if_complete` se fijan al declarar el job para
/// que la lógica de reinicio pueda decidir sin construir el step. El step
/// construido debe coincidir en ambos; si no, falla con
/// `InvalidConfiguration`.
pub struct JobScopedStep {
    name: String,
    allow_start_if_complete: bool,
    factory: LateBound<Box<dyn Step>>,
}

impl JobScopedStep {
    pub fn new<S, F>(name: impl Into<String>, factory: F) -> Self
        where S: Step + 'static,
              F: Fn(&ParameterBinder<'_>) -> Result<S, BatchError> + Send + Sync + 'static
    {
        let name = name.into();
        let factory = LateBound::job(name.clone(), move |b: &ParameterBinder<'_>| factory(b).map(|s| Box::new(s) as Box<dyn Step>));
        Self { name,
               allow_start_if_complete: false,
               factory }
    }

    pub fn allow_start_if_complete(mut self, allow: bool) -> Self {
        self.allow_start_if_complete = allow;
        self
    }
}

impl Step for JobScopedStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn allow_start_if_complete(&self) -> bool {
        self.allow_start_if_complete
    }

    fn execute(&self, ctx: &mut StepContext<'_>, repository: &dyn JobRepository) -> Result<BatchStatus, BatchError> {
        let step = self.factory.resolve(&ctx.job_scope())?;
        if step.name() != self.name {
            return Err(BatchError::InvalidConfiguration(format!("job-scoped step '{}' built a step named '{}'",
                                                                self.name,
                                                                step.name())));
        }
        if step.allow_start_if_complete() != self.allow_start_if_complete {
            return Err(BatchError::InvalidConfiguration(format!("job-scoped step '{}' declares allow_start_if_complete={} \
                                                                 but built a step with {}",
                                                                self.name,
                                                                self.allow_start_if_complete,
                                                                step.allow_start_if_complete())));
        }
        step.execute(ctx, repository)
    }
}

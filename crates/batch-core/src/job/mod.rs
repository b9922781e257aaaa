//! Definición de job y driver secuencial de steps.
//!
//! Un `Job` es inmutable tras `build`: la misma definición se puede lanzar
//! varias veces (incluso en paralelo, con parámetros distintos). Todo el
//! estado de un run vive en su `JobExecution`.

pub mod builder;
pub mod listener;

use log::{error, info, warn};

pub use builder::{JobBuilder, JobBuilderInit};
pub use listener::JobExecutionListener;

use crate::errors::BatchError;
use crate::launch::JobParametersIncrementer;
use crate::model::{BatchStatus, JobExecution, JobParameters, StepExecution};
use crate::repo::JobRepository;
use crate::step::{Step, StepContext};

pub struct Job {
    name: String,
    steps: Vec<Box<dyn Step>>,
    listeners: Vec<Box<dyn JobExecutionListener>>,
    incrementer: Option<Box<dyn JobParametersIncrementer>>,
    required_parameters: Vec<String>,
}

impl Job {
    pub fn builder(name: impl Into<String>) -> JobBuilderInit {
        JobBuilderInit::new(name.into())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn incrementer(&self) -> Option<&dyn JobParametersIncrementer> {
        self.incrementer.as_deref()
    }

    /// Si alguno de sus steps debe volver a correr aunque la instancia ya
    /// haya completado (habilita relanzar una instancia `Completed`).
    pub fn any_step_allows_start_if_complete(&self) -> bool {
        self.steps.iter().any(|s| s.allow_start_if_complete())
    }

    /// Comprueba que los parámetros obligatorios estén presentes.
    pub fn validate_parameters(&self, parameters: &JobParameters) -> Result<(), BatchError> {
        let missing: Vec<&str> = self.required_parameters
                                     .iter()
                                     .filter(|name| !parameters.contains(name))
                                     .map(String::as_str)
                                     .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BatchError::InvalidParameters(format!("job '{}' requires parameters: {}", self.name, missing.join(", "))))
        }
    }

    /// Ejecuta los steps en orden sobre una ejecución ya registrada.
    ///
    /// - Un step `Completed` en una ejecución previa de la instancia se salta
    ///   salvo `allow_start_if_complete`.
    /// - Un step no completado previamente arranca con el contexto guardado
    ///   por su última `StepExecution`.
    /// - El primer step `Failed` termina el job en `Failed`; los siguientes no
    ///   corren.
    /// - Una petición de parada entre steps termina el job en `Stopped`.
    pub fn execute(&self, execution: &mut JobExecution, repository: &dyn JobRepository) {
        execution.mark_started();
        repository.update_job_execution(execution);
        info!("job_start job={} execution={} params=[{}]", self.name, execution.id(), execution.parameters());

        for listener in &self.listeners {
            listener.before_job(execution);
        }

        let mut status = BatchStatus::Completed;
        let mut failure = None;
        for step in &self.steps {
            if execution.is_stop_requested() {
                status = BatchStatus::Stopped;
                break;
            }

            let previous = repository.last_step_execution(execution.instance().id, step.name());
            let mut step_execution = StepExecution::new(step.name(), execution.id());
            match previous {
                Some(prev) if prev.status() == BatchStatus::Completed && !step.allow_start_if_complete() => {
                    info!("step_skip job={} step={} reason=completed", self.name, step.name());
                    continue;
                }
                Some(prev) if prev.status() != BatchStatus::Completed => {
                    step_execution.restore_context(prev.execution_context().clone());
                }
                _ => {}
            }

            step_execution.mark_started();
            repository.update_step_execution(&step_execution);
            let result = {
                let mut ctx = StepContext::new(&mut step_execution, execution);
                step.execute(&mut ctx, repository)
            };
            match result {
                Ok(step_status) => step_execution.finish(step_status, None),
                Err(e) => {
                    error!("step_failed job={} step={} kind={} err={}", self.name, step.name(), e.kind(), e);
                    step_execution.finish(BatchStatus::Failed, Some(e));
                }
            }
            repository.update_step_execution(&step_execution);
            info!("step_end job={} step={} status={} read={} write={} filter={} commits={}",
                  self.name,
                  step.name(),
                  step_execution.status(),
                  step_execution.read_count(),
                  step_execution.write_count(),
                  step_execution.filter_count(),
                  step_execution.commit_count());

            let step_status = step_execution.status();
            let step_failure = step_execution.failure().cloned();
            execution.add_step_execution(step_execution);
            repository.update_job_execution(execution);
            match step_status {
                BatchStatus::Failed => {
                    status = BatchStatus::Failed;
                    failure = step_failure;
                    break;
                }
                BatchStatus::Stopped => {
                    status = BatchStatus::Stopped;
                    break;
                }
                _ => {}
            }
        }

        execution.finish(status, failure);
        repository.update_job_execution(execution);
        info!("job_end job={} execution={} status={} writes={}",
              self.name,
              execution.id(),
              execution.status(),
              execution.write_count());

        for listener in &self.listeners {
            if let Err(e) = listener.after_job(execution) {
                warn!("after_job listener failed job={} err={}", self.name, e);
            }
        }
    }
}

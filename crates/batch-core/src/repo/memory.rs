//! `JobRepository` en memoria.
//!
//! Todo el estado vive detrás de un único `Mutex`, de modo que la creación de
//! instancias y ejecuciones queda serializada entre lanzamientos concurrentes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use uuid::Uuid;

use super::JobRepository;
use crate::errors::BatchError;
use crate::model::{BatchStatus, JobExecution, JobInstance, JobParameters, StepExecution};

#[derive(Default)]
struct Inner {
    /// (job_name, job_key) -> instancia
    instances: HashMap<(String, String), JobInstance>,
    /// instancia -> ejecuciones en orden de creación
    executions: HashMap<Uuid, Vec<JobExecution>>,
    /// job execution -> step executions en orden de inicio
    steps: HashMap<Uuid, Vec<StepExecution>>,
    last_parameters: HashMap<String, JobParameters>,
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    inner: Mutex<Inner>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobRepository for InMemoryJobRepository {
    fn create_job_execution(&self,
                            job_name: &str,
                            parameters: &JobParameters,
                            rerun_completed: bool)
                            -> Result<JobExecution, BatchError> {
        let mut inner = self.lock();
        let key = (job_name.to_string(), parameters.job_key());

        let instance = match inner.instances.get(&key).cloned() {
            Some(existing) => existing,
            None => {
                let created = JobInstance::new(job_name, parameters);
                debug!("create_instance job={job_name} instance={} key={}", created.id, created.job_key);
                inner.instances.insert(key, created.clone());
                created
            }
        };

        let mut execution = JobExecution::new(instance.clone(), parameters.clone());
        if let Some(last) = inner.executions.get(&instance.id).and_then(|v| v.last()) {
            match last.status() {
                s if s.is_running() => {
                    return Err(BatchError::JobAlreadyRunning { job_name: job_name.to_string(),
                                                               execution_id: last.id() });
                }
                BatchStatus::Completed if !rerun_completed => {
                    return Err(BatchError::DuplicateRun { job_name: job_name.to_string(),
                                                          job_key: instance.job_key.clone() });
                }
                BatchStatus::Failed | BatchStatus::Stopped => {
                    debug!("restart job={job_name} instance={} previous={}", instance.id, last.id());
                    execution.restore_context(last.execution_context().clone());
                }
                _ => {}
            }
        }

        inner.executions.entry(instance.id).or_default().push(execution.clone());
        inner.last_parameters.insert(job_name.to_string(), parameters.clone());
        Ok(execution)
    }

    fn update_job_execution(&self, execution: &JobExecution) {
        let mut inner = self.lock();
        if let Some(slot) = inner.executions
                                 .get_mut(&execution.instance().id)
                                 .and_then(|v| v.iter_mut().find(|e| e.id() == execution.id()))
        {
            *slot = execution.clone();
        }
    }

    fn update_step_execution(&self, step_execution: &StepExecution) {
        let mut inner = self.lock();
        let steps = inner.steps.entry(step_execution.job_execution_id()).or_default();
        match steps.iter_mut().find(|s| s.id() == step_execution.id()) {
            Some(slot) => *slot = step_execution.clone(),
            None => steps.push(step_execution.clone()),
        }
    }

    fn last_step_execution(&self, instance_id: Uuid, step_name: &str) -> Option<StepExecution> {
        let inner = self.lock();
        let executions = inner.executions.get(&instance_id)?;
        executions.iter()
                  .rev()
                  .filter_map(|e| inner.steps.get(&e.id()))
                  .find_map(|steps| steps.iter().rev().find(|s| s.step_name() == step_name))
                  .cloned()
    }

    fn last_parameters(&self, job_name: &str) -> Option<JobParameters> {
        self.lock().last_parameters.get(job_name).cloned()
    }

    fn job_instance_count(&self, job_name: &str) -> usize {
        self.lock().instances.keys().filter(|(name, _)| name == job_name).count()
    }

    fn job_executions(&self, instance_id: Uuid) -> Vec<JobExecution> {
        self.lock().executions.get(&instance_id).cloned().unwrap_or_default()
    }
}

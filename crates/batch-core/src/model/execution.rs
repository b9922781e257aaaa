//! Registros de identidad y ejecución: `JobInstance`, `JobExecution`,
//! `StepExecution` y `StepContribution`.
//!
//! Los campos son de sólo lectura fuera del crate; las transiciones de estado
//! las hacen el driver del job y los drivers de step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BatchStatus, ExecutionContext, JobParameters};
use crate::errors::BatchError;

/// Identidad de un job lógico con su conjunto de parámetros identificadores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInstance {
    pub id: Uuid,
    pub job_name: String,
    pub job_key: String,
}

impl JobInstance {
    pub fn new(job_name: impl Into<String>, parameters: &JobParameters) -> Self {
        Self { id: Uuid::new_v4(),
               job_name: job_name.into(),
               job_key: parameters.job_key() }
    }
}

/// Bandera de parada compartida entre el caller y la ejecución en curso.
///
/// Se consulta en los límites de chunk y entre steps.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Un intento de ejecutar una `JobInstance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobExecution {
    id: Uuid,
    instance: JobInstance,
    parameters: JobParameters,
    status: BatchStatus,
    create_time: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    execution_context: ExecutionContext,
    step_executions: Vec<StepExecution>,
    failure: Option<BatchError>,
    #[serde(skip)]
    stop: StopHandle,
}

impl JobExecution {
    /// Nueva ejecución en estado `Starting`.
    pub fn new(instance: JobInstance, parameters: JobParameters) -> Self {
        Self { id: Uuid::new_v4(),
               instance,
               parameters,
               status: BatchStatus::Starting,
               create_time: Utc::now(),
               start_time: None,
               end_time: None,
               execution_context: ExecutionContext::new(),
               step_executions: Vec::new(),
               failure: None,
               stop: StopHandle::default() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn instance(&self) -> &JobInstance {
        &self.instance
    }

    pub fn job_name(&self) -> &str {
        &self.instance.job_name
    }

    pub fn parameters(&self) -> &JobParameters {
        &self.parameters
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Contexto con alcance de job: visible para todos los steps del run.
    pub fn execution_context(&self) -> &ExecutionContext {
        &self.execution_context
    }

    pub fn execution_context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.execution_context
    }

    pub fn step_executions(&self) -> &[StepExecution] {
        &self.step_executions
    }

    pub fn step_execution(&self, step_name: &str) -> Option<&StepExecution> {
        self.step_executions.iter().find(|s| s.step_name == step_name)
    }

    /// Primer error fatal del run, si lo hubo.
    pub fn failure(&self) -> Option<&BatchError> {
        self.failure.as_ref()
    }

    /// Suma de `write_count` de todos los steps.
    pub fn write_count(&self) -> u64 {
        self.step_executions.iter().map(StepExecution::write_count).sum()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    pub(crate) fn restore_context(&mut self, context: ExecutionContext) {
        self.execution_context = context;
    }

    pub(crate) fn mark_started(&mut self) {
        self.status = BatchStatus::Started;
        self.start_time = Some(Utc::now());
    }

    pub(crate) fn add_step_execution(&mut self, step_execution: StepExecution) {
        self.step_executions.push(step_execution);
    }

    /// Fija el estado terminal. Un error previo no se sobrescribe.
    pub(crate) fn finish(&mut self, status: BatchStatus, failure: Option<BatchError>) {
        self.status = status;
        if self.failure.is_none() {
            self.failure = failure;
        }
        self.end_time = Some(Utc::now());
    }
}

/// Un intento de ejecutar un step dentro de una `JobExecution`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepExecution {
    id: Uuid,
    job_execution_id: Uuid,
    step_name: String,
    status: BatchStatus,
    read_count: u64,
    write_count: u64,
    filter_count: u64,
    skip_count: u64,
    commit_count: u64,
    rollback_count: u64,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    execution_context: ExecutionContext,
    failure: Option<BatchError>,
}

impl StepExecution {
    pub fn new(step_name: impl Into<String>, job_execution_id: Uuid) -> Self {
        Self { id: Uuid::new_v4(),
               job_execution_id,
               step_name: step_name.into(),
               status: BatchStatus::Starting,
               read_count: 0,
               write_count: 0,
               filter_count: 0,
               skip_count: 0,
               commit_count: 0,
               rollback_count: 0,
               start_time: None,
               end_time: None,
               execution_context: ExecutionContext::new(),
               failure: None }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Referencia a la `JobExecution` dueña.
    pub fn job_execution_id(&self) -> Uuid {
        self.job_execution_id
    }

    pub fn step_name(&self) -> &str {
        &self.step_name
    }

    pub fn status(&self) -> BatchStatus {
        self.status
    }

    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn filter_count(&self) -> u64 {
        self.filter_count
    }

    /// El bucle base no salta items; queda en 0 salvo en registros restaurados.
    pub fn skip_count(&self) -> u64 {
        self.skip_count
    }

    /// Chunks (o iteraciones de tasklet) confirmados.
    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }

    pub fn rollback_count(&self) -> u64 {
        self.rollback_count
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Contexto con alcance de step: nunca visible desde otro step.
    pub fn execution_context(&self) -> &ExecutionContext {
        &self.execution_context
    }

    pub fn execution_context_mut(&mut self) -> &mut ExecutionContext {
        &mut self.execution_context
    }

    pub fn failure(&self) -> Option<&BatchError> {
        self.failure.as_ref()
    }

    pub(crate) fn restore_context(&mut self, context: ExecutionContext) {
        self.execution_context = context;
    }

    pub(crate) fn mark_started(&mut self) {
        self.status = BatchStatus::Started;
        self.start_time = Some(Utc::now());
    }

    /// Aplica los contadores de una contribución confirmada.
    pub(crate) fn apply(&mut self, contribution: &StepContribution, committed_chunk: bool) {
        self.read_count += contribution.read_count;
        self.write_count += contribution.write_count;
        self.filter_count += contribution.filter_count;
        if committed_chunk {
            self.commit_count += 1;
        }
    }

    pub(crate) fn increment_rollback_count(&mut self) {
        self.rollback_count += 1;
    }

    pub(crate) fn finish(&mut self, status: BatchStatus, failure: Option<BatchError>) {
        self.status = status;
        self.failure = failure;
        self.end_time = Some(Utc::now());
    }
}

/// Contadores acumulados durante un chunk o una invocación de tasklet.
///
/// Se aplican a la `StepExecution` sólo cuando la transacción confirma.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepContribution {
    read_count: u64,
    write_count: u64,
    filter_count: u64,
}

impl StepContribution {
    pub fn increment_read_count(&mut self) {
        self.read_count += 1;
    }

    pub fn increment_read_count_by(&mut self, n: u64) {
        self.read_count += n;
    }

    pub fn increment_write_count(&mut self, n: u64) {
        self.write_count += n;
    }

    pub fn increment_filter_count(&mut self) {
        self.filter_count += 1;
    }

    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn filter_count(&self) -> u64 {
        self.filter_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_is_applied_on_commit() {
        let mut step = StepExecution::new("s", Uuid::new_v4());
        let mut c = StepContribution::default();
        c.increment_read_count_by(3);
        c.increment_filter_count();
        c.increment_write_count(2);
        step.apply(&c, true);
        step.apply(&StepContribution::default(), false);
        assert_eq!((step.read_count(), step.write_count(), step.filter_count()), (3, 2, 1));
        assert_eq!(step.commit_count(), 1);
    }

    #[test]
    fn first_failure_is_kept() {
        let params = JobParameters::new();
        let mut job = JobExecution::new(JobInstance::new("job", &params), params);
        job.finish(BatchStatus::Failed, Some(BatchError::Internal("first".into())));
        job.finish(BatchStatus::Failed, Some(BatchError::Internal("second".into())));
        assert_eq!(job.failure(), Some(&BatchError::Internal("first".into())));
        assert!(job.status().is_terminal());
    }
}

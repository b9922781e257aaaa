use chrono::Utc;

use crate::constants::RUN_ID_KEY;
use crate::errors::BatchError;
use crate::model::JobParameters;

/// Deriva los parámetros del siguiente lanzamiento a partir de los del
/// anterior, para que relanzar un job con los mismos parámetros de usuario
/// produzca una `JobInstance` nueva.
pub trait JobParametersIncrementer: Send + Sync {
    fn get_next(&self, previous: Option<&JobParameters>) -> Result<JobParameters, BatchError>;
}

fn next_run_id(previous: &JobParameters, key: &str) -> Result<i64, BatchError> {
    previous.get_long(key)
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| BatchError::InvalidParameters(format!("'{key}' cannot be incremented past {}", i64::MAX)))
}

/// `run.id` = `run.id` anterior + 1 (1 en el primer lanzamiento).
#[derive(Debug, Clone)]
pub struct RunIdIncrementer {
    key: String,
}

impl RunIdIncrementer {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for RunIdIncrementer {
    fn default() -> Self {
        Self::with_key(RUN_ID_KEY)
    }
}

impl JobParametersIncrementer for RunIdIncrementer {
    fn get_next(&self, previous: Option<&JobParameters>) -> Result<JobParameters, BatchError> {
        let base = previous.cloned().unwrap_or_default();
        let next = next_run_id(&base, &self.key)?;
        Ok(base.with_long(self.key.clone(), next))
    }
}

/// `run.id` = max(anterior + 1, epoch actual en milisegundos): sigue siendo
/// único aunque se pierda el historial del repositorio.
#[derive(Debug, Clone, Default)]
pub struct UniqueRunIdIncrementer;

impl JobParametersIncrementer for UniqueRunIdIncrementer {
    fn get_next(&self, previous: Option<&JobParameters>) -> Result<JobParameters, BatchError> {
        let base = previous.cloned().unwrap_or_default();
        let next = next_run_id(&base, RUN_ID_KEY)?.max(Utc::now().timestamp_millis());
        Ok(base.with_long(RUN_ID_KEY, next))
    }
}

use chrono::NaiveDate;

use crate::errors::BatchError;
use crate::model::{ExecutionContext, JobExecution, JobParameters, ParamValue, StepExecution};

/// Conversión de un `ParamValue` al tipo que pide un componente.
///
/// Los valores `string` se parsean si el tipo destino no es texto, de modo
/// que `chunkSize=20` y `chunkSize(long)=20` resuelven igual.
pub trait FromJobParameter: Sized {
    fn from_param(value: &ParamValue) -> Option<Self>;
}

impl FromJobParameter for String {
    fn from_param(value: &ParamValue) -> Option<Self> {
        Some(value.to_string())
    }
}

impl FromJobParameter for i64 {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Long(v) => Some(*v),
            ParamValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromJobParameter for usize {
    fn from_param(value: &ParamValue) -> Option<Self> {
        i64::from_param(value).and_then(|v| usize::try_from(v).ok())
    }
}

impl FromJobParameter for f64 {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Double(v) => Some(*v),
            ParamValue::Long(v) => Some(*v as f64),
            ParamValue::String(s) => s.trim().parse().ok(),
            ParamValue::Date(_) => None,
        }
    }
}

impl FromJobParameter for NaiveDate {
    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Date(d) => Some(*d),
            ParamValue::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        }
    }
}

impl FromJobParameter for bool {
    fn from_param(value: &ParamValue) -> Option<Self> {
        value.as_str().and_then(|s| s.trim().parse().ok())
    }
}

/// Vista de la ejecución activa que reciben las fábricas `LateBound`.
#[derive(Clone, Copy)]
pub struct ParameterBinder<'s> {
    job_execution: &'s JobExecution,
    step_execution: Option<&'s StepExecution>,
}

impl<'s> ParameterBinder<'s> {
    pub(crate) fn new(job_execution: &'s JobExecution, step_execution: Option<&'s StepExecution>) -> Self {
        Self { job_execution,
               step_execution }
    }

    pub fn parameters(&self) -> &'s JobParameters {
        self.job_execution.parameters()
    }

    pub fn job_execution(&self) -> &'s JobExecution {
        self.job_execution
    }

    /// `None` en alcance de job.
    pub fn step_execution(&self) -> Option<&'s StepExecution> {
        self.step_execution
    }

    pub fn step_name(&self) -> Option<&'s str> {
        self.step_execution.map(StepExecution::step_name)
    }

    pub fn job_context(&self) -> &'s ExecutionContext {
        self.job_execution.execution_context()
    }

    /// Parámetro obligatorio; `MissingParameter` si no está.
    pub fn required<T: FromJobParameter>(&self, name: &str) -> Result<T, BatchError> {
        self.optional(name)?.ok_or_else(|| BatchError::MissingParameter(name.to_string()))
    }

    /// Parámetro opcional; error sólo si existe pero no convierte a `T`.
    pub fn optional<T: FromJobParameter>(&self, name: &str) -> Result<Option<T>, BatchError> {
        match self.parameters().value(name) {
            None => Ok(None),
            Some(v) => T::from_param(v).map(Some).ok_or_else(|| {
                BatchError::InvalidParameters(format!("parameter '{name}' ({}) cannot be bound as {}",
                                                      v.type_name(),
                                                      std::any::type_name::<T>()))
            }),
        }
    }

    /// Parámetro con default declarado.
    pub fn or_default<T: FromJobParameter>(&self, name: &str, default: T) -> Result<T, BatchError> {
        Ok(self.optional(name)?.unwrap_or(default))
    }
}

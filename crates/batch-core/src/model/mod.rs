//! Modelo de ejecución: parámetros, contextos, estados y registros.

pub mod context;
pub mod execution;
pub mod params;
pub mod status;

pub use context::ExecutionContext;
pub use execution::{JobExecution, JobInstance, StepContribution, StepExecution, StopHandle};
pub use params::{JobParameter, JobParameters, ParamValue};
pub use status::{BatchStatus, RepeatStatus};

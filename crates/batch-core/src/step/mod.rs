//! Steps: definición (`Step`), contexto de ejecución (`StepContext`) y los
//! dos drivers disponibles.
//!
//! - `ChunkStep`: bucle leer/procesar/acumular/escribir/confirmar.
//! - `TaskletStep`: callback repetido hasta `RepeatStatus::Finished`.
//! - `JobScopedStep`: step construido al llegar el job a él (late binding con
//!   alcance de job).

pub mod chunk;
pub mod context;
pub mod definition;
pub mod job_scoped;
pub mod tasklet;
pub mod transaction;

pub use chunk::{ChunkStep, ChunkStepBuilder};
pub use context::StepContext;
pub use definition::Step;
pub use job_scoped::JobScopedStep;
pub use tasklet::{tasklet_fn, FnTasklet, Tasklet, TaskletStep, TaskletStepBuilder};
pub use transaction::{ResourcelessTransactionManager, TransactionManager};

//! batch-core: motor batch orientado a chunks.
//!
//! Un `Job` es una secuencia lineal de steps. Cada step es un `ChunkStep`
//! (leer, procesar, acumular, escribir y confirmar en bloques de tamaño fijo)
//! o un `TaskletStep` (callback repetido). El `JobLauncher` resuelve la
//! identidad del run (`JobInstance`) a partir de los parámetros
//! identificadores y registra cada intento (`JobExecution`/`StepExecution`)
//! en un `JobRepository`, lo que permite rechazar duplicados y reiniciar
//! ejecuciones fallidas desde el último chunk confirmado.
pub mod bind;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod item;
pub mod job;
pub mod launch;
pub mod model;
pub mod repo;
pub mod step;

pub use bind::{LateBound, ParameterBinder, Scope, ScopeKind};
pub use errors::{BatchError, ItemError, ItemResult};
pub use item::{CompositeItemProcessor, DeduplicatingProcessor, ItemProcessor, ItemProcessorExt, ItemReader, ItemWriter,
               ListItemReader, PassThroughItemProcessor, RetryingItemWriter};
pub use job::{Job, JobExecutionListener};
pub use launch::{JobLauncher, JobParametersIncrementer, RunIdIncrementer, UniqueRunIdIncrementer};
pub use model::{BatchStatus, ExecutionContext, JobExecution, JobInstance, JobParameter, JobParameters, ParamValue,
                RepeatStatus, StepContribution, StepExecution, StopHandle};
pub use repo::{InMemoryJobRepository, JobRepository};
pub use step::{tasklet_fn, ChunkStep, JobScopedStep, Step, StepContext, Tasklet, TaskletStep, TransactionManager};

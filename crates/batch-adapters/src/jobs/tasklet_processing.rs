//! Procesamiento por tasklet: el propio tasklet pagina una lista usando el
//! contador de lectura del step como cursor.

use batch_core::{tasklet_fn, BatchError, Job, RepeatStatus, TaskletStep, UniqueRunIdIncrementer};
use log::info;

pub const CHUNK_PROCESSING_JOB: &str = "chunkProcessingJob";

pub fn hello_items(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{i} Hello")).collect()
}

/// Tamaño de página desde el parámetro `chunkSize`; sin él, o si viene vacío,
/// 10.
pub fn task_base_step(items: Vec<String>) -> Result<TaskletStep, BatchError> {
    TaskletStep::builder("taskBaseStep").tasklet(move |binder| {
                                            let raw: String = binder.or_default("chunkSize", String::new())?;
                                            let page_size = match raw.trim() {
                                                "" => 10,
                                                s => s.parse::<usize>().map_err(|e| {
                                                                           BatchError::InvalidParameters(format!("chunkSize '{s}': {e}"))
                                                                       })?,
                                            };
                                            if page_size == 0 {
                                                return Err(BatchError::InvalidParameters("chunkSize must be > 0".into()));
                                            }
                                            let items = items.clone();
                                            Ok(tasklet_fn(move |contribution, ctx| {
                                                let from = ctx.step_execution().read_count() as usize;
                                                if from >= items.len() {
                                                    return Ok(RepeatStatus::Finished);
                                                }
                                                let to = (from + page_size).min(items.len());
                                                info!("task item size : {}", to - from);
                                                contribution.increment_read_count_by((to - from) as u64);
                                                Ok(RepeatStatus::Continuable)
                                            }))
                                        })
                                        .build()
}

pub fn chunk_processing_job(items: Vec<String>) -> Result<Job, BatchError> {
    Job::builder(CHUNK_PROCESSING_JOB).incrementer(UniqueRunIdIncrementer)
                                      .start(task_base_step(items)?)
                                      .build()
}

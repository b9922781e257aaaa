//! Late binding: el step se construye con el parámetro `name` cuando el job
//! llega a él y el tasklet vuelve a leerlo al empezar el step.

use batch_core::{tasklet_fn, BatchError, Job, JobScopedStep, RepeatStatus, TaskletStep, UniqueRunIdIncrementer};
use log::info;

pub const JOB_PARAMETERS_JOB: &str = "jobParameters";
pub const LATE_BINDING_STEP: &str = "lateBindingOfStep";

fn late_binding_step(name: Option<String>) -> Result<TaskletStep, BatchError> {
    info!("print late binding of Step : {}", name.as_deref().unwrap_or("null"));
    TaskletStep::builder(LATE_BINDING_STEP).tasklet(|binder| {
                                               let name: Option<String> = binder.optional("name")?;
                                               Ok(tasklet_fn(move |_, ctx| {
                                                   let shown = name.as_deref().unwrap_or("null");
                                                   info!("print Job Parameters : {shown}");
                                                   ctx.step_context_mut().put_string("printed", shown);
                                                   Ok(RepeatStatus::Finished)
                                               }))
                                           })
                                           .build()
}

/// Con `require_name` el launcher rechaza runs sin `name` antes de crear
/// instancia; sin él, el step imprime `null`.
pub fn job_parameters_job(require_name: bool) -> Result<Job, BatchError> {
    let mut builder = Job::builder(JOB_PARAMETERS_JOB).incrementer(UniqueRunIdIncrementer);
    if require_name {
        builder = builder.required_parameter("name");
    }
    builder.start(JobScopedStep::new(LATE_BINDING_STEP, |binder| late_binding_step(binder.optional("name")?)))
           .build()
}

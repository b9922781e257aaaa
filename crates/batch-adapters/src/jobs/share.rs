//! Alcance de los contextos: lo que `shareStep1` guarda en el contexto del
//! job lo ve `shareStep2`; lo que guarda en el suyo propio, no.

use batch_core::{tasklet_fn, BatchError, Job, RepeatStatus, RunIdIncrementer, TaskletStep};
use log::info;

pub const SHARE_JOB: &str = "shareJob";

fn share_step1() -> Result<TaskletStep, BatchError> {
    TaskletStep::builder("shareStep1").tasklet(|_| {
                                          Ok(tasklet_fn(|_, ctx| {
                                              ctx.step_context_mut().put_string("step", "step execution context");
                                              ctx.job_context_mut().put_string("job", "job execution context");
                                              info!("jobName : {}, stepName : {}, run.id : {:?}",
                                                    ctx.job_execution().job_name(),
                                                    ctx.step_name(),
                                                    ctx.job_parameters().get_long("run.id"));
                                              Ok(RepeatStatus::Finished)
                                          }))
                                      })
                                      .build()
}

fn share_step2() -> Result<TaskletStep, BatchError> {
    TaskletStep::builder("shareStep2").tasklet(|_| {
                                          Ok(tasklet_fn(|_, ctx| {
                                              let job_value = ctx.job_context().get_string_or("job", "emptyJob");
                                              let step_value = ctx.step_context().get_string_or("step", "emptyStep");
                                              info!("jobValue : {job_value}, stepValue : {step_value}");
                                              ctx.step_context_mut().put_string("observed", format!("{job_value}|{step_value}"));
                                              Ok(RepeatStatus::Finished)
                                          }))
                                      })
                                      .build()
}

pub fn share_job() -> Result<Job, BatchError> {
    Job::builder(SHARE_JOB).incrementer(RunIdIncrementer::default())
                           .start(share_step1()?)
                           .next(share_step2()?)
                           .build()
}

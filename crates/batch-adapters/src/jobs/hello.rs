use batch_core::{tasklet_fn, BatchError, Job, RepeatStatus, RunIdIncrementer, TaskletStep};
use log::info;

pub const HELLO_JOB: &str = "helloJob";

pub fn hello_job() -> Result<Job, BatchError> {
    let step = TaskletStep::builder("helloStep").tasklet(|_| {
                                                    Ok(tasklet_fn(|_, _| {
                                                        info!("hello batch!");
                                                        Ok(RepeatStatus::Finished)
                                                    }))
                                                })
                                                .build()?;
    Job::builder(HELLO_JOB).incrementer(RunIdIncrementer::default()).start(step).build()
}

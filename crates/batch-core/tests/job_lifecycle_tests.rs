use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use batch_core::{tasklet_fn, BatchError, BatchStatus, InMemoryJobRepository, Job, JobExecution, JobExecutionListener, JobScopedStep,
                 JobLauncher, JobParameters, JobRepository, RepeatStatus, RunIdIncrementer, TaskletStep,
                 UniqueRunIdIncrementer};

fn launcher() -> JobLauncher<InMemoryJobRepository> {
    JobLauncher::new(Arc::new(InMemoryJobRepository::new()))
}

fn noop_step(name: &str) -> TaskletStep {
    TaskletStep::builder(name).tasklet(|_| Ok(tasklet_fn(|_, _| Ok(RepeatStatus::Finished))))
                              .build()
                              .unwrap()
}

#[test]
fn identical_identifying_parameters_are_a_duplicate_run() {
    let job = Job::builder("helloJob").start(noop_step("helloStep")).build().unwrap();
    let launcher = launcher();
    let params = JobParameters::new().with_string("requestDate", "2024-01-01");

    let first = launcher.run(&job, params.clone()).unwrap();
    assert_eq!(first.status(), BatchStatus::Completed);

    let err = launcher.run(&job, params).unwrap_err();
    assert_eq!(err,
               BatchError::DuplicateRun { job_name: "helloJob".into(),
                                          job_key: first.instance().job_key.clone() });

    let other = launcher.run(&job, JobParameters::new().with_string("requestDate", "2024-01-02")).unwrap();
    assert_ne!(other.instance().id, first.instance().id);
}

#[test]
fn incrementer_produces_a_new_instance_per_launch() {
    let job = Job::builder("helloJob").incrementer(RunIdIncrementer::default())
                                      .start(noop_step("helloStep"))
                                      .build()
                                      .unwrap();
    let launcher = launcher();

    let first = launcher.run(&job, JobParameters::new()).unwrap();
    let second = launcher.run(&job, JobParameters::new()).unwrap();

    assert_eq!(first.parameters().get_long("run.id"), Some(1));
    assert_eq!(second.parameters().get_long("run.id"), Some(2));
    assert_ne!(first.instance().id, second.instance().id);
    assert_eq!(launcher.repository().job_instance_count("helloJob"), 2);
}

#[test]
fn unique_incrementer_tolerates_lost_history() {
    let job = Job::builder("helloJob").incrementer(UniqueRunIdIncrementer)
                                      .start(noop_step("helloStep"))
                                      .build()
                                      .unwrap();
    let first = launcher().run(&job, JobParameters::new()).unwrap();
    let second = launcher().run(&job, JobParameters::new()).unwrap();
    assert_eq!(first.status(), BatchStatus::Completed);
    assert_eq!(second.status(), BatchStatus::Completed);
}

#[test]
fn missing_required_parameter_is_rejected_before_any_instance_exists() {
    let job = Job::builder("jobParametersJob").required_parameter("name")
                                              .start(noop_step("printStep"))
                                              .build()
                                              .unwrap();
    let launcher = launcher();

    let err = launcher.run(&job, JobParameters::new()).unwrap_err();
    assert!(matches!(err, BatchError::InvalidParameters(_)));
    assert_eq!(launcher.repository().job_instance_count("jobParametersJob"), 0);

    let ok = launcher.run(&job, JobParameters::new().with_string("name", "human")).unwrap();
    assert_eq!(ok.status(), BatchStatus::Completed);
}

#[test]
fn duplicate_step_names_are_rejected() {
    let job = Job::builder("job").start(noop_step("same")).next(noop_step("same")).build();
    assert!(matches!(job, Err(BatchError::InvalidConfiguration(_))));
}

#[test]
fn job_context_is_shared_and_step_context_is_private() {
    let producer = TaskletStep::builder("shareStep1").tasklet(|_| {
                                                        Ok(tasklet_fn(|_, ctx| {
                                                            ctx.step_context_mut().put_string("step", "shareStep1");
                                                            ctx.job_context_mut().put_string("job", "shareJob");
                                                            Ok(RepeatStatus::Finished)
                                                        }))
                                                    })
                                                    .build()
                                                    .unwrap();
    let consumer = TaskletStep::builder("shareStep2").tasklet(|_| {
                                                        Ok(tasklet_fn(|_, ctx| {
                                                            let job = ctx.job_context().get_string_or("job", "emptyJob");
                                                            let step = ctx.step_context().get_string_or("step", "emptyStep");
                                                            ctx.step_context_mut().put_string("seen", format!("{job}/{step}"));
                                                            Ok(RepeatStatus::Finished)
                                                        }))
                                                    })
                                                    .build()
                                                    .unwrap();
    let job = Job::builder("shareJob").start(producer).next(consumer).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    let seen = execution.step_execution("shareStep2").unwrap().execution_context().get_string("seen");
    assert_eq!(seen, Some("shareJob/emptyStep"));
    assert_eq!(execution.execution_context().get_string("job"), Some("shareJob"));
}

struct CountingListener {
    before: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl JobExecutionListener for CountingListener {
    fn before_job(&self, execution: &mut JobExecution) {
        self.before.fetch_add(1, Ordering::SeqCst);
        execution.execution_context_mut().put_string("startedBy", "listener");
    }

    fn after_job(&self, execution: &JobExecution) -> Result<(), BatchError> {
        self.writes.store(execution.write_count() as usize, Ordering::SeqCst);
        Err(BatchError::Listener("report sink unavailable".into()))
    }
}

#[test]
fn listener_error_does_not_change_job_status() {
    let before = Arc::new(AtomicUsize::new(0));
    let writes = Arc::new(AtomicUsize::new(usize::MAX));
    let job = Job::builder("listenedJob").listener(CountingListener { before: before.clone(),
                                                                      writes: writes.clone() })
                                         .start(noop_step("step1"))
                                         .build()
                                         .unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Completed);
    assert!(execution.failure().is_none());
    assert_eq!(before.load(Ordering::SeqCst), 1);
    assert_eq!(writes.load(Ordering::SeqCst), 0);
    assert_eq!(execution.execution_context().get_string("startedBy"), Some("listener"));
}

#[test]
fn stop_request_ends_job_as_stopped_at_next_boundary() {
    let iterations = Arc::new(AtomicUsize::new(0));
    let counter = iterations.clone();
    let stopping = TaskletStep::builder("longStep").tasklet(move |_| {
                                                       let counter = counter.clone();
                                                       Ok(tasklet_fn(move |_, ctx| {
                                                           counter.fetch_add(1, Ordering::SeqCst);
                                                           ctx.job_execution().stop_handle().stop();
                                                           Ok(RepeatStatus::Continuable)
                                                       }))
                                                   })
                                                   .build()
                                                   .unwrap();
    let job = Job::builder("stoppableJob").start(stopping).next(noop_step("after")).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Stopped);
    assert_eq!(iterations.load(Ordering::SeqCst), 1);
    assert_eq!(execution.step_execution("longStep").unwrap().status(), BatchStatus::Stopped);
    assert!(execution.step_execution("after").is_none());
}

#[test]
fn stop_before_execute_skips_every_step() {
    let job = Job::builder("stoppableJob").start(noop_step("step1")).build().unwrap();
    let launcher = launcher();
    let execution = launcher.prepare(&job, JobParameters::new()).unwrap();
    execution.stop_handle().stop();

    let execution = launcher.execute(&job, execution);

    assert_eq!(execution.status(), BatchStatus::Stopped);
    assert!(execution.step_executions().is_empty());
}

#[test]
fn concurrent_identical_launches_create_one_instance() {
    let slow = TaskletStep::builder("slowStep").tasklet(|_| {
                                                   Ok(tasklet_fn(|_, _| {
                                                       thread::sleep(Duration::from_millis(50));
                                                       Ok(RepeatStatus::Finished)
                                                   }))
                                               })
                                               .build()
                                               .unwrap();
    let job = Job::builder("concurrentJob").start(slow).build().unwrap();
    let launcher = launcher();
    let params = JobParameters::new().with_string("name", "same");

    let results: Vec<Result<JobExecution, BatchError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| launcher.run(&job, params.clone()))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let completed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(completed, 1);
    assert!(results.iter()
                   .filter_map(|r| r.as_ref().err())
                   .all(|e| matches!(e, BatchError::JobAlreadyRunning { .. } | BatchError::DuplicateRun { .. })));
    assert_eq!(launcher.repository().job_instance_count("concurrentJob"), 1);
}

#[test]
fn job_scoped_step_is_built_with_run_parameters() {
    let job = Job::builder("jobParametersJob").start(noop_step("first"))
                                              .next_late("printJobParameters", |binder| {
                                                  let name: String = binder.required("name")?;
                                                  TaskletStep::builder("printJobParameters").tasklet(move |_| {
                                                                                              let greeting = format!("hello {name}");
                                                                                              Ok(tasklet_fn(move |_, ctx| {
                                                                                                  ctx.step_context_mut()
                                                                                                     .put_string("greeting", greeting.clone());
                                                                                                  Ok(RepeatStatus::Finished)
                                                                                              }))
                                                                                          })
                                                                                          .build()
                                                  })
                                              .build()
                                              .unwrap();
    let launcher = launcher();

    for name in ["alice", "bob"] {
        let execution = launcher.run(&job, JobParameters::new().with_string("name", name)).unwrap();
        let step = execution.step_execution("printJobParameters").unwrap();
        assert_eq!(step.execution_context().get_string("greeting"), Some(format!("hello {name}").as_str()));
    }

    let failed = launcher.run(&job, JobParameters::new()).unwrap();
    assert_eq!(failed.status(), BatchStatus::Failed);
    assert_eq!(failed.failure(), Some(&BatchError::MissingParameter("name".into())));
}

#[test]
fn run_id_at_upper_bound_cannot_be_incremented() {
    let job = Job::builder("helloJob").incrementer(RunIdIncrementer::default())
                                      .start(noop_step("helloStep"))
                                      .build()
                                      .unwrap();
    let launcher = launcher();

    let last = launcher.run(&job, JobParameters::new().with_long("run.id", i64::MAX)).unwrap();
    assert_eq!(last.parameters().get_long("run.id"), Some(i64::MAX));

    let err = launcher.run(&job, JobParameters::new()).unwrap_err();
    assert!(matches!(err, BatchError::InvalidParameters(_)));
    assert_eq!(launcher.repository().job_instance_count("helloJob"), 1);
}

fn rerunnable_step(name: &'static str, allow: bool) -> Result<TaskletStep, BatchError> {
    TaskletStep::builder(name).tasklet(|_| Ok(tasklet_fn(|_, _| Ok(RepeatStatus::Finished))))
                              .allow_start_if_complete(allow)
                              .build()
}

#[test]
fn job_scoped_step_restart_flag_must_match_built_step() {
    let matching = Job::builder("lateJob").start(JobScopedStep::new("late", |_| rerunnable_step("late", true))
                                                     .allow_start_if_complete(true))
                                          .build()
                                          .unwrap();
    let launcher = launcher();
    let first = launcher.run(&matching, JobParameters::new()).unwrap();
    let again = launcher.run(&matching, JobParameters::new()).unwrap();
    assert_eq!(again.status(), BatchStatus::Completed);
    assert_eq!(again.instance().id, first.instance().id);

    let mismatched = Job::builder("lateJob").start(JobScopedStep::new("late", |_| rerunnable_step("late", true)))
                                            .build()
                                            .unwrap();
    let execution = self::launcher().run(&mismatched, JobParameters::new()).unwrap();
    assert_eq!(execution.status(), BatchStatus::Failed);
    assert!(matches!(execution.failure(), Some(BatchError::InvalidConfiguration(_))));
}

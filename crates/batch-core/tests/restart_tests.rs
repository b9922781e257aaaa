use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use batch_core::{tasklet_fn, BatchError, BatchStatus, ChunkStep, InMemoryJobRepository, ItemError, ItemResult, Job,
                 JobLauncher, JobParameters, JobRepository, ListItemReader, RepeatStatus, TaskletStep};

fn launcher() -> JobLauncher<InMemoryJobRepository> {
    JobLauncher::new(Arc::new(InMemoryJobRepository::new()))
}

fn counting_step(name: &str, calls: Arc<AtomicUsize>, allow_restart: bool) -> TaskletStep {
    TaskletStep::builder(name).tasklet(move |_| {
                                  let calls = calls.clone();
                                  Ok(tasklet_fn(move |_, _| {
                                      calls.fetch_add(1, Ordering::SeqCst);
                                      Ok(RepeatStatus::Finished)
                                  }))
                              })
                              .allow_start_if_complete(allow_restart)
                              .build()
                              .unwrap()
}

fn fail_once_step(name: &str, armed: Arc<AtomicBool>) -> TaskletStep {
    TaskletStep::builder(name).tasklet(move |_| {
                                  let armed = armed.clone();
                                  Ok(tasklet_fn(move |_, ctx| {
                                      let attempts = ctx.job_context().get_long_or("attempts", 0) + 1;
                                      ctx.job_context_mut().put_long("attempts", attempts);
                                      if armed.swap(false, Ordering::SeqCst) {
                                          Err(ItemError::failed("transient"))
                                      } else {
                                          Ok(RepeatStatus::Finished)
                                      }
                                  }))
                              })
                              .build()
                              .unwrap()
}

#[test]
fn restart_resumes_chunk_step_after_last_commit() {
    let written: Arc<Mutex<Vec<u32>>> = Arc::default();
    let armed = Arc::new(AtomicBool::new(true));
    let sink = written.clone();
    let fail = armed.clone();
    let step = ChunkStep::<u32, u32>::builder("importStep", 10).reader(|_| Ok(ListItemReader::new((0..25).collect())))
                                                               .writer(move |_| {
                                                                   let sink = sink.clone();
                                                                   let fail = fail.clone();
                                                                   Ok(move |chunk: &[u32]| -> ItemResult<()> {
                                                                       if chunk[0] == 10 && fail.swap(false, Ordering::SeqCst) {
                                                                           return Err(ItemError::failed("lock timeout"));
                                                                       }
                                                                       sink.lock().unwrap().extend_from_slice(chunk);
                                                                       Ok(())
                                                                   })
                                                               })
                                                               .build()
                                                               .unwrap();
    let job = Job::builder("importJob").start(step).build().unwrap();
    let launcher = launcher();
    let params = JobParameters::new().with_string("file", "members.csv");

    let first = launcher.run(&job, params.clone()).unwrap();
    assert_eq!(first.status(), BatchStatus::Failed);
    assert_eq!(*written.lock().unwrap(), (0..10).collect::<Vec<_>>());

    let second = launcher.run(&job, params).unwrap();
    assert_eq!(second.status(), BatchStatus::Completed);
    assert_eq!(second.instance().id, first.instance().id);
    assert_eq!(*written.lock().unwrap(), (0..25).collect::<Vec<_>>());
    let step = second.step_execution("importStep").unwrap();
    assert_eq!((step.read_count(), step.write_count(), step.commit_count()), (15, 15, 2));
    assert_eq!(launcher.repository().job_executions(first.instance().id).len(), 2);
}

#[test]
fn completed_steps_are_skipped_on_restart() {
    let first_calls = Arc::new(AtomicUsize::new(0));
    let armed = Arc::new(AtomicBool::new(true));
    let job = Job::builder("restartJob").start(counting_step("prepare", first_calls.clone(), false))
                                        .next(fail_once_step("load", armed))
                                        .build()
                                        .unwrap();
    let launcher = launcher();

    let failed = launcher.run(&job, JobParameters::new()).unwrap();
    assert_eq!(failed.status(), BatchStatus::Failed);
    assert!(matches!(failed.failure(), Some(BatchError::Tasklet { step, .. }) if step == "load"));
    assert_eq!(failed.step_execution("load").unwrap().rollback_count(), 1);

    let restarted = launcher.run(&job, JobParameters::new()).unwrap();
    assert_eq!(restarted.status(), BatchStatus::Completed);
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert!(restarted.step_execution("prepare").is_none());
    assert_eq!(restarted.step_execution("load").unwrap().status(), BatchStatus::Completed);
    // el contexto de job de la ejecución fallida pasa al reinicio
    assert_eq!(restarted.execution_context().get_long("attempts"), Some(2));
}

#[test]
fn allow_start_if_complete_reruns_step_and_completed_instance() {
    let calls = Arc::new(AtomicUsize::new(0));
    let job = Job::builder("rerunJob").start(counting_step("always", calls.clone(), true)).build().unwrap();
    let launcher = launcher();

    let first = launcher.run(&job, JobParameters::new()).unwrap();
    let second = launcher.run(&job, JobParameters::new()).unwrap();

    assert_eq!(first.status(), BatchStatus::Completed);
    assert_eq!(second.status(), BatchStatus::Completed);
    assert_eq!(first.instance().id, second.instance().id);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_step_keeps_counts_of_committed_chunks() {
    let step = ChunkStep::<u32, u32>::builder("step1", 3).reader(|_| {
                                                             let mut n = 0u32;
                                                             Ok(move || -> ItemResult<Option<u32>> {
                                                                 n += 1;
                                                                 if n == 8 {
                                                                     Err(ItemError::Io("connection reset".into()))
                                                                 } else {
                                                                     Ok(Some(n))
                                                                 }
                                                             })
                                                         })
                                                         .writer(|_| Ok(|_: &[u32]| -> ItemResult<()> { Ok(()) }))
                                                         .build()
                                                         .unwrap();
    let job = Job::builder("readerJob").start(step).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Failed);
    let step = execution.step_execution("step1").unwrap();
    assert_eq!((step.read_count(), step.write_count(), step.commit_count()), (6, 6, 2));
    assert_eq!(execution.failure(),
               Some(&BatchError::Reader { step: "step1".into(),
                                          position: 7,
                                          message: "io: connection reset".into() }));
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use batch_core::{BatchError, BatchStatus, ChunkStep, DeduplicatingProcessor, InMemoryJobRepository, ItemError, ItemResult,
                 Job, JobLauncher, JobParameters, ListItemReader, RunIdIncrementer, StopHandle, TransactionManager};

type Sink<T> = Arc<Mutex<Vec<Vec<T>>>>;

fn launcher() -> JobLauncher<InMemoryJobRepository> {
    JobLauncher::new(Arc::new(InMemoryJobRepository::new()))
}

fn recording_step(name: &str, items: Vec<u32>, chunk_size: usize, sink: Sink<u32>) -> ChunkStep<u32, u32> {
    ChunkStep::<u32, u32>::builder(name, chunk_size).reader(move |_| Ok(ListItemReader::new(items.clone())))
                                                    .writer(move |_| {
                                                        let sink = sink.clone();
                                                        Ok(move |chunk: &[u32]| -> ItemResult<()> {
                                                            sink.lock().unwrap().push(chunk.to_vec());
                                                            Ok(())
                                                        })
                                                    })
                                                    .build()
                                                    .unwrap()
}

#[test]
fn twenty_three_items_are_written_in_three_chunks() {
    let sink: Sink<u32> = Arc::default();
    let job = Job::builder("chunkJob").start(recording_step("step1", (0..23).collect(), 10, sink.clone()))
                                      .build()
                                      .unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Completed);
    let sizes: Vec<usize> = sink.lock().unwrap().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![10, 10, 3]);
    let step = execution.step_execution("step1").unwrap();
    assert_eq!((step.read_count(), step.write_count(), step.commit_count()), (23, 23, 3));
    assert_eq!(step.rollback_count(), 0);
}

#[test]
fn filtered_items_never_reach_the_writer() {
    let sink: Sink<u32> = Arc::default();
    let writer_sink = sink.clone();
    let step = ChunkStep::<u32, u32>::builder("evens", 3).reader(|_| Ok(ListItemReader::new((0..10).collect())))
                                                         .processor(|_| {
                                                             Ok(|n: u32| -> ItemResult<Option<u32>> {
                                                                 Ok(if n % 2 == 0 { Some(n) } else { None })
                                                             })
                                                         })
                                                         .writer(move |_| {
                                                             let sink = writer_sink.clone();
                                                             Ok(move |chunk: &[u32]| -> ItemResult<()> {
                                                                 sink.lock().unwrap().push(chunk.to_vec());
                                                                 Ok(())
                                                             })
                                                         })
                                                         .build()
                                                         .unwrap();
    let job = Job::builder("filterJob").start(step).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(*sink.lock().unwrap(), vec![vec![0, 2, 4], vec![6, 8]]);
    let step = execution.step_execution("evens").unwrap();
    assert_eq!((step.read_count(), step.filter_count(), step.write_count()), (10, 5, 5));
    assert_eq!(step.commit_count(), 2);
}

#[test]
fn deduplication_spans_chunks_within_one_step_execution() {
    let sink: Sink<String> = Arc::default();
    let writer_sink = sink.clone();
    let names: Vec<String> = ["a", "b", "a", "c", "b"].iter().map(|s| s.to_string()).collect();
    let step = ChunkStep::<String, String>::builder("dedup", 2).reader(move |_| Ok(ListItemReader::new(names.clone())))
                                                               .processor(|_| Ok(DeduplicatingProcessor::new(|s: &String| s.clone())))
                                                               .writer(move |_| {
                                                                   let sink = writer_sink.clone();
                                                                   Ok(move |chunk: &[String]| -> ItemResult<()> {
                                                                       sink.lock().unwrap().push(chunk.to_vec());
                                                                       Ok(())
                                                                   })
                                                               })
                                                               .build()
                                                               .unwrap();
    let job = Job::builder("dedupJob").incrementer(RunIdIncrementer::default()).start(step).build().unwrap();
    let launcher = launcher();

    let execution = launcher.run(&job, JobParameters::new()).unwrap();
    assert_eq!(*sink.lock().unwrap(), vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]]);
    assert_eq!(execution.step_execution("dedup").unwrap().filter_count(), 2);

    // una ejecución nueva construye un processor nuevo: sin claves previas
    sink.lock().unwrap().clear();
    launcher.run(&job, JobParameters::new()).unwrap();
    assert_eq!(sink.lock().unwrap().concat().len(), 3);
}

#[test]
fn empty_input_completes_without_writing() {
    let sink: Sink<u32> = Arc::default();
    let job = Job::builder("emptyJob").start(recording_step("step1", vec![], 10, sink.clone())).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Completed);
    assert!(sink.lock().unwrap().is_empty());
    let step = execution.step_execution("step1").unwrap();
    assert_eq!((step.read_count(), step.write_count(), step.commit_count()), (0, 0, 0));
}

#[test]
fn chunk_size_one_commits_every_item() {
    let sink: Sink<u32> = Arc::default();
    let job = Job::builder("singleJob").start(recording_step("step1", vec![7, 8, 9], 1, sink.clone())).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(*sink.lock().unwrap(), vec![vec![7], vec![8], vec![9]]);
    assert_eq!(execution.step_execution("step1").unwrap().commit_count(), 3);
}

#[test]
fn zero_chunk_size_or_missing_writer_is_rejected_at_build() {
    let zero = ChunkStep::<u32, u32>::builder("s", 0).reader(|_| Ok(ListItemReader::new(vec![1u32])))
                                                     .writer(|_| Ok(|_: &[u32]| -> ItemResult<()> { Ok(()) }))
                                                     .build();
    assert!(matches!(zero, Err(BatchError::InvalidConfiguration(_))));

    let no_writer = ChunkStep::<u32, u32>::builder("s", 5).reader(|_| Ok(ListItemReader::new(vec![1u32]))).build();
    assert!(matches!(no_writer, Err(BatchError::InvalidConfiguration(_))));
}

#[test]
fn writer_failure_rolls_back_chunk_and_fails_the_job() {
    let calls = Arc::new(AtomicUsize::new(0));
    let writer_calls = calls.clone();
    let failing = ChunkStep::<u32, u32>::builder("step1", 10).reader(|_| Ok(ListItemReader::new((0..30).collect())))
                                                             .writer(move |_| {
                                                                 let calls = writer_calls.clone();
                                                                 Ok(move |_: &[u32]| -> ItemResult<()> {
                                                                     if calls.fetch_add(1, Ordering::SeqCst) == 1 {
                                                                         Err(ItemError::failed("disk full"))
                                                                     } else {
                                                                         Ok(())
                                                                     }
                                                                 })
                                                             })
                                                             .build()
                                                             .unwrap();
    let sink: Sink<u32> = Arc::default();
    let job = Job::builder("failingJob").start(failing)
                                        .next(recording_step("step2", vec![1], 10, sink.clone()))
                                        .build()
                                        .unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Failed);
    let step = execution.step_execution("step1").unwrap();
    assert_eq!(step.status(), BatchStatus::Failed);
    assert_eq!((step.read_count(), step.write_count(), step.commit_count()), (10, 10, 1));
    assert_eq!(step.rollback_count(), 1);
    assert_eq!(execution.failure(),
               Some(&BatchError::ChunkWrite { step: "step1".into(),
                                              chunk_index: 1,
                                              item_count: 10,
                                              position: 20,
                                              message: "disk full".into() }));
    assert!(execution.step_execution("step2").is_none());
    assert!(sink.lock().unwrap().is_empty());
}

#[test]
fn processor_failure_reports_item_position() {
    let step = ChunkStep::<u32, u32>::builder("step1", 4).reader(|_| Ok(ListItemReader::new((1..=10).collect())))
                                                         .processor(|_| {
                                                             Ok(|n: u32| -> ItemResult<Option<u32>> {
                                                                 if n == 6 {
                                                                     Err(ItemError::failed("bad item"))
                                                                 } else {
                                                                     Ok(Some(n))
                                                                 }
                                                             })
                                                         })
                                                         .writer(|_| Ok(|_: &[u32]| -> ItemResult<()> { Ok(()) }))
                                                         .build()
                                                         .unwrap();
    let job = Job::builder("processorJob").start(step).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Failed);
    assert!(matches!(execution.failure(), Some(BatchError::Processor { position: 6, .. })));
    assert_eq!(execution.step_execution("step1").unwrap().write_count(), 4);
}

#[derive(Default)]
struct CountingTransactionManager {
    begins: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    fail_commit_at: Option<usize>,
}

impl TransactionManager for CountingTransactionManager {
    fn begin(&self) -> ItemResult<()> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn commit(&self) -> ItemResult<()> {
        let n = self.commits.fetch_add(1, Ordering::SeqCst);
        if Some(n) == self.fail_commit_at {
            return Err(ItemError::failed("connection lost"));
        }
        Ok(())
    }

    fn rollback(&self) {
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn every_chunk_runs_inside_its_own_transaction() {
    let tm = Arc::new(CountingTransactionManager::default());
    let step = ChunkStep::<u32, u32>::builder("step1", 5).reader(|_| Ok(ListItemReader::new((0..12).collect())))
                                                         .writer(|_| Ok(|_: &[u32]| -> ItemResult<()> { Ok(()) }))
                                                         .transaction_manager(tm.clone())
                                                         .build()
                                                         .unwrap();
    let job = Job::builder("txJob").start(step).build().unwrap();

    launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(tm.begins.load(Ordering::SeqCst), 3);
    assert_eq!(tm.commits.load(Ordering::SeqCst), 3);
    assert_eq!(tm.rollbacks.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_commit_keeps_last_committed_reader_position() {
    let tm = Arc::new(CountingTransactionManager { fail_commit_at: Some(1),
                                                   ..Default::default() });
    let step = ChunkStep::<u32, u32>::builder("step1", 5).reader(|_| Ok(ListItemReader::named("numbers", (0..12).collect())))
                                                         .writer(|_| Ok(|_: &[u32]| -> ItemResult<()> { Ok(()) }))
                                                         .transaction_manager(tm.clone())
                                                         .build()
                                                         .unwrap();
    let job = Job::builder("txJob").start(step).build().unwrap();

    let execution = launcher().run(&job, JobParameters::new()).unwrap();

    assert_eq!(execution.status(), BatchStatus::Failed);
    assert!(matches!(execution.failure(), Some(BatchError::ChunkWrite { chunk_index: 1, .. })));
    let step = execution.step_execution("step1").unwrap();
    assert_eq!(step.execution_context().get_long("numbers.read.count"), Some(5));
    assert_eq!((step.write_count(), step.commit_count(), step.rollback_count()), (5, 1, 1));
    assert_eq!(tm.rollbacks.load(Ordering::SeqCst), 1);
}

#[test]
fn stop_request_ends_chunk_step_at_next_commit_boundary() {
    let handle: Arc<Mutex<Option<StopHandle>>> = Arc::default();
    let writer_handle = handle.clone();
    // el writer pide la parada al escribir el primer chunk
    let step = ChunkStep::<u32, u32>::builder("step1", 2).reader(|_| Ok(ListItemReader::new((0..10).collect())))
                                                         .writer(move |_| {
                                                             let handle = writer_handle.clone();
                                                             Ok(move |_: &[u32]| -> ItemResult<()> {
                                                                 if let Some(stop) = handle.lock().unwrap().as_ref() {
                                                                     stop.stop();
                                                                 }
                                                                 Ok(())
                                                             })
                                                         })
                                                         .build()
                                                         .unwrap();
    let job = Job::builder("stoppableChunkJob").start(step).build().unwrap();
    let launcher = launcher();
    let execution = launcher.prepare(&job, JobParameters::new()).unwrap();
    *handle.lock().unwrap() = Some(execution.stop_handle());

    let execution = launcher.execute(&job, execution);

    assert_eq!(execution.status(), BatchStatus::Stopped);
    let step = execution.step_execution("step1").unwrap();
    assert_eq!(step.status(), BatchStatus::Stopped);
    assert_eq!((step.read_count(), step.write_count(), step.commit_count()), (2, 2, 1));
}

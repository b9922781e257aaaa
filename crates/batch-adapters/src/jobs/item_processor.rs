//! Cadena de processors: descarta ids impares y después nombres repetidos.

use batch_core::{BatchError, ChunkStep, CompositeItemProcessor, DeduplicatingProcessor, ItemResult, Job,
                 ListItemReader, UniqueRunIdIncrementer};
use batch_domain::Person;
use log::info;

pub const ITEM_PROCESSOR_JOB: &str = "itemProcessorJob";

/// Diez personas con ids 1..=10 y nombres `test name0`..`test name9`.
pub fn sample_persons() -> Vec<Person> {
    (0..10).map(|i| Person::new(i + 1, format!("test name{i}"), "test age", "test address"))
           .collect()
}

pub fn person_chain() -> CompositeItemProcessor<Person> {
    CompositeItemProcessor::new().delegate(|p: Person| -> ItemResult<Option<Person>> {
                                     Ok(if p.id % 2 == 0 { Some(p) } else { None })
                                 })
                                 .delegate(DeduplicatingProcessor::new(|p: &Person| p.name.clone()))
}

pub fn item_processor_job(persons: Vec<Person>, chunk_size: usize) -> Result<Job, BatchError> {
    let step = ChunkStep::<Person, Person>::builder("itemProcessorStep", chunk_size)
        .reader(move |_| Ok(ListItemReader::named("personListReader", persons.clone())))
        .processor(|_| Ok(person_chain()))
        .writer(|_| {
            Ok(|items: &[Person]| -> ItemResult<()> {
                items.iter().for_each(|p| info!("PERSON.ID : {}", p.id));
                Ok(())
            })
        })
        .build()?;
    Job::builder(ITEM_PROCESSOR_JOB).incrementer(UniqueRunIdIncrementer).start(step).build()
}

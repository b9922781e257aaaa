//! Jobs sobre la tabla de personas: inserción por lotes y lectura con
//! cursor.

use std::sync::Arc;

use batch_core::{BatchError, ChunkStep, Job, ListItemReader, RunIdIncrementer};
use batch_domain::{Person, PersonRecord};

use super::person_copy::to_record;
use crate::readers::PersonCursorReader;
use crate::store::InMemoryPersonStore;
use crate::writers::{LoggingItemWriter, PersonStoreWriter};

pub const BATCH_ITEM_WRITER_JOB: &str = "batchItemWriterJob";
pub const BATCH_ITEM_WRITER_STEP: &str = "batchItemWriterStep";
pub const CURSOR_ITEM_READER_JOB: &str = "cursorItemReaderJob";
pub const CURSOR_ITEM_READER_STEP: &str = "cursorItemReaderStep";

/// Inserta `persons` en el almacén, un lote por chunk dentro de su
/// transacción.
pub fn batch_item_writer_job(store: Arc<InMemoryPersonStore>,
                             persons: Vec<Person>,
                             chunk_size: usize)
                             -> Result<Job, BatchError> {
    let writer_store = store.clone();
    let step = ChunkStep::<Person, Person>::builder(BATCH_ITEM_WRITER_STEP, chunk_size)
        .reader(move |_| Ok(ListItemReader::named("batchItemWriterReader", persons.clone())))
        .processor::<PersonRecord, _, _>(|_| Ok(to_record))
        .writer(move |_| Ok(PersonStoreWriter::new(writer_store.clone())))
        .transaction_manager(store)
        .build()?;
    Job::builder(BATCH_ITEM_WRITER_JOB).start(step).build()
}

/// Lee con cursor todo lo confirmado en el almacén y lo registra en el log.
pub fn cursor_item_reader_job(store: Arc<InMemoryPersonStore>, chunk_size: usize) -> Result<Job, BatchError> {
    let step = ChunkStep::<PersonRecord, PersonRecord>::builder(CURSOR_ITEM_READER_STEP, chunk_size)
        .reader(move |_| Ok(PersonCursorReader::new("cursorItemReader", store.clone())))
        .writer(|_| Ok(LoggingItemWriter::<PersonRecord>::new("Current Person=")))
        .build()?;
    Job::builder(CURSOR_ITEM_READER_JOB).incrementer(RunIdIncrementer::default()).start(step).build()
}

//! Copia personas de un CSV al almacén de destino, rellenando con `UNKNOWN`
//! los nombres vacíos.

use std::path::PathBuf;
use std::sync::Arc;

use batch_core::{BatchError, ChunkStep, ItemProcessorExt, ItemResult, Job, RunIdIncrementer};
use batch_domain::{Person, PersonRecord};

use super::flat_file::{person_file_reader, INPUT_FILE_PARAM};
use crate::store::InMemoryPersonStore;
use crate::writers::PersonStoreWriter;

pub const PERSON_COPY_JOB: &str = "personCopyJob";

pub fn to_record(person: Person) -> ItemResult<Option<PersonRecord>> {
    Ok(Some(PersonRecord::from(&person)))
}

pub fn fill_unknown_name(record: PersonRecord) -> ItemResult<Option<PersonRecord>> {
    if record.has_name() {
        Ok(Some(record))
    } else {
        Ok(Some(record.with_unknown_name()))
    }
}

pub fn person_copy_job(store: Arc<InMemoryPersonStore>,
                       default_file: PathBuf,
                       chunk_size: usize)
                       -> Result<Job, BatchError> {
    let default_file = default_file.to_string_lossy().into_owned();
    let writer_store = store.clone();
    let step = ChunkStep::<Person, Person>::builder("personCopyStep", chunk_size)
        .reader(move |binder| {
            let path: String = binder.or_default(INPUT_FILE_PARAM, default_file.clone())?;
            person_file_reader("personCopyReader", path)
        })
        .processor(|_| Ok(ItemProcessorExt::<Person, PersonRecord>::then(to_record, fill_unknown_name)))
        .writer(move |_| Ok(PersonStoreWriter::new(writer_store.clone())))
        .transaction_manager(store)
        .build()?;
    Job::builder(PERSON_COPY_JOB).incrementer(RunIdIncrementer::default()).start(step).build()
}

//! Lectura de un CSV de personas con cabecera.

use std::path::{Path, PathBuf};

use batch_core::{BatchError, ChunkStep, ItemResult, Job};
use batch_domain::Person;

use crate::readers::{DelimitedFileReader, FieldSet};
use crate::writers::LoggingItemWriter;

pub const FLAT_FILE_JOB: &str = "flatFileItemReaderJob";
pub const INPUT_FILE_PARAM: &str = "inputFile";
pub const PERSON_FIELDS: [&str; 4] = ["id", "name", "age", "address"];

pub fn map_person(fields: &FieldSet) -> ItemResult<Person> {
    Ok(Person::new(fields.read_parsed("id")?,
                   fields.read_string("name")?,
                   fields.read_string("age")?,
                   fields.read_string("address")?))
}

/// Reader de `id,name,age,address` que salta la línea de cabecera.
pub fn person_file_reader(name: &str, path: impl AsRef<Path>) -> Result<DelimitedFileReader<Person>, BatchError> {
    DelimitedFileReader::builder(name).path(path.as_ref())
                                      .names(&PERSON_FIELDS)
                                      .lines_to_skip(1)
                                      .mapper(map_person)
                                      .build()
}

/// El fichero sale del parámetro `inputFile` o, si falta, de `default_file`.
/// El step se vuelve a ejecutar aunque ya haya completado.
pub fn flat_file_job(default_file: PathBuf, chunk_size: usize) -> Result<Job, BatchError> {
    let default_file = default_file.to_string_lossy().into_owned();
    let step = ChunkStep::<Person, Person>::builder("csvFileStep", chunk_size)
        .reader(move |binder| {
            let path: String = binder.or_default(INPUT_FILE_PARAM, default_file.clone())?;
            person_file_reader("csvFileItemReader", path)
        })
        .writer(|_| Ok(LoggingItemWriter::<Person>::new("Current Person=")))
        .allow_start_if_complete(true)
        .build()?;
    Job::builder(FLAT_FILE_JOB).start(step).build()
}

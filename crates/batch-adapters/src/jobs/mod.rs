//! Jobs de ejemplo y el catálogo que los construye por nombre.

pub mod flat_file;
pub mod hello;
pub mod item_processor;
pub mod job_parameters;
pub mod member_level;
pub mod person_copy;
pub mod person_table;
pub mod share;
pub mod tasklet_processing;

use std::path::PathBuf;
use std::sync::Arc;

use batch_core::constants::DEFAULT_CHUNK_SIZE;
use batch_core::{BatchError, Job};
use batch_domain::MemberRepository;

use crate::store::{InMemoryMemberRepository, InMemoryPersonStore};

/// Ajustes comunes a los jobs del catálogo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub chunk_size: usize,
    pub person_file: PathBuf,
    /// Cargar `sample_members()` al crear el catálogo.
    pub seed_members: bool,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE,
               person_file: PathBuf::from("data/person.csv"),
               seed_members: true }
    }
}

/// Construye los jobs de ejemplo sobre almacenes compartidos.
pub struct JobCatalog {
    settings: CatalogSettings,
    members: Arc<InMemoryMemberRepository>,
    persons: Arc<InMemoryPersonStore>,
}

impl JobCatalog {
    pub const JOB_NAMES: [&'static str; 11] = [hello::HELLO_JOB,
                                               share::SHARE_JOB,
                                               item_processor::ITEM_PROCESSOR_JOB,
                                               tasklet_processing::CHUNK_PROCESSING_JOB,
                                               job_parameters::JOB_PARAMETERS_JOB,
                                               flat_file::FLAT_FILE_JOB,
                                               person_copy::PERSON_COPY_JOB,
                                               person_table::BATCH_ITEM_WRITER_JOB,
                                               person_table::CURSOR_ITEM_READER_JOB,
                                               member_level::SAVE_MEMBER_JOB,
                                               member_level::MEMBER_LEVEL_UP_JOB];

    pub fn new(settings: CatalogSettings) -> Result<Self, BatchError> {
        if settings.chunk_size == 0 {
            return Err(BatchError::InvalidConfiguration("chunk size must be > 0".into()));
        }
        let members = Arc::new(InMemoryMemberRepository::new());
        if settings.seed_members {
            members.save_all(member_level::sample_members())
                   .map_err(|e| BatchError::Internal(format!("seeding members: {e}")))?;
        }
        Ok(Self { settings,
                  members,
                  persons: Arc::new(InMemoryPersonStore::new()) })
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    pub fn members(&self) -> &Arc<InMemoryMemberRepository> {
        &self.members
    }

    pub fn persons(&self) -> &Arc<InMemoryPersonStore> {
        &self.persons
    }

    pub fn build(&self, name: &str) -> Result<Job, BatchError> {
        let chunk_size = self.settings.chunk_size;
        match name {
            hello::HELLO_JOB => hello::hello_job(),
            share::SHARE_JOB => share::share_job(),
            item_processor::ITEM_PROCESSOR_JOB => {
                item_processor::item_processor_job(item_processor::sample_persons(), chunk_size)
            }
            tasklet_processing::CHUNK_PROCESSING_JOB => {
                tasklet_processing::chunk_processing_job(tasklet_processing::hello_items(100))
            }
            job_parameters::JOB_PARAMETERS_JOB => job_parameters::job_parameters_job(false),
            flat_file::FLAT_FILE_JOB => flat_file::flat_file_job(self.settings.person_file.clone(), chunk_size),
            person_copy::PERSON_COPY_JOB => {
                person_copy::person_copy_job(self.persons.clone(), self.settings.person_file.clone(), chunk_size)
            }
            person_table::BATCH_ITEM_WRITER_JOB => {
                person_table::batch_item_writer_job(self.persons.clone(), item_processor::sample_persons(), chunk_size)
            }
            person_table::CURSOR_ITEM_READER_JOB => person_table::cursor_item_reader_job(self.persons.clone(), chunk_size),
            member_level::SAVE_MEMBER_JOB => {
                member_level::save_member_job(self.members.clone(), member_level::sample_members())
            }
            member_level::MEMBER_LEVEL_UP_JOB => member_level::member_level_up_job(self.members.clone(), chunk_size),
            other => Err(BatchError::InvalidConfiguration(format!("unknown job '{other}' (available: {})",
                                                                  Self::JOB_NAMES.join(", ")))),
        }
    }
}

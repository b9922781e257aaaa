//! batch-adapters: implementaciones concretas alrededor del motor.
//!
//! Este crate provee:
//! - Readers: fichero delimitado (`DelimitedFileReader`), lector paginado
//!   de socios (`MemberPagingReader`) y cursor de personas
//!   (`PersonCursorReader`).
//! - Writers: `LoggingItemWriter`, `PersonStoreWriter`.
//! - Almacenes en memoria con transacción por chunk
//!   (`InMemoryMemberRepository`, `InMemoryPersonStore`).
//! - Jobs de ejemplo y un `JobCatalog` que los construye por nombre.
//!
//! Nota: el core sólo conoce los traits `ItemReader`/`ItemProcessor`/
//! `ItemWriter`/`TransactionManager`; todo lo específico del dominio vive
//! aquí.

pub mod jobs;
pub mod readers;
pub mod store;
pub mod writers;

pub use jobs::{CatalogSettings, JobCatalog};
pub use readers::{DelimitedFileReader, FieldSet, MemberPagingReader, PersonCursorReader};
pub use store::{InMemoryMemberRepository, InMemoryPersonStore};
pub use writers::{LoggingItemWriter, PersonStoreWriter};

use batch_core::ItemError;
use batch_domain::DomainError;

/// Traduce un error de dominio al error de etapa que entiende el motor.
pub(crate) fn item_error(e: DomainError) -> ItemError {
    match e {
        DomainError::SerializationError(m) => ItemError::Parse(m),
        other => ItemError::Failed(other.to_string()),
    }
}

//! Readers concretos: fichero delimitado, paginado sobre el repositorio de
//! socios y cursor sobre el almacén de personas.

pub mod cursor;
pub mod delimited;
pub mod paging;

pub use cursor::PersonCursorReader;
pub use delimited::{DelimitedFileReader, DelimitedFileReaderBuilder, FieldSet};
pub use paging::MemberPagingReader;

//! Writers concretos.

pub mod logging;
pub mod person;

pub use logging::LoggingItemWriter;
pub use person::PersonStoreWriter;

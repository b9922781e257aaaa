//! Contratos de las etapas del pipeline de chunk: reader, processor y writer.
//!
//! Cada contrato es un trait de un único método obligatorio; las
//! implementaciones concretas (listas en memoria, ficheros, tablas) se eligen
//! al cablear el step, nunca por item.

pub mod composite;
pub mod dedup;
pub mod list;
pub mod processor;
pub mod reader;
pub mod writer;

pub use composite::CompositeItemProcessor;
pub use dedup::DeduplicatingProcessor;
pub use list::ListItemReader;
pub use processor::{Chained, ItemProcessor, ItemProcessorExt, PassThroughItemProcessor};
pub use reader::ItemReader;
pub use writer::{ItemWriter, RetryingItemWriter};

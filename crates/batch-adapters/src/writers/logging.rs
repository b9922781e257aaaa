use std::fmt::Display;
use std::marker::PhantomData;

use batch_core::{ItemResult, ItemWriter};
use log::info;

/// Writer que emite cada item del chunk como una línea de log `info`.
pub struct LoggingItemWriter<T> {
    label: String,
    written: u64,
    _item: PhantomData<fn(&T)>,
}

impl<T> LoggingItemWriter<T> {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(),
               written: 0,
               _item: PhantomData }
    }

    /// Items escritos por esta instancia.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl<T: Display> ItemWriter<T> for LoggingItemWriter<T> {
    fn write(&mut self, items: &[T]) -> ItemResult<()> {
        for item in items {
            info!("{} {item}", self.label);
        }
        self.written += items.len() as u64;
        Ok(())
    }
}

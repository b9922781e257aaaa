use std::sync::Arc;
use std::vec::IntoIter;

use batch_core::{ExecutionContext, ItemError, ItemReader, ItemResult};
use batch_domain::PersonRecord;
use log::debug;

use crate::store::InMemoryPersonStore;

/// Recorre los registros confirmados del almacén de personas con una sola
/// consulta.
///
/// `open` toma una instantánea de la tabla y `read` la consume en orden;
/// lo que se confirme después no entra en esta lectura. El número de
/// registros entregados se guarda como `<name>.read.count` y en un reinicio
/// se saltan esos registros.
pub struct PersonCursorReader {
    name: String,
    store: Arc<InMemoryPersonStore>,
    cursor: Option<IntoIter<PersonRecord>>,
    read_count: u64,
}

impl PersonCursorReader {
    pub fn new(name: impl Into<String>, store: Arc<InMemoryPersonStore>) -> Self {
        Self { name: name.into(),
               store,
               cursor: None,
               read_count: 0 }
    }

    fn count_key(&self) -> String {
        format!("{}.read.count", self.name)
    }
}

impl ItemReader<PersonRecord> for PersonCursorReader {
    fn read(&mut self) -> ItemResult<Option<PersonRecord>> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Err(ItemError::failed(format!("cursor '{}' is not open", self.name)));
        };
        let next = cursor.next();
        if next.is_some() {
            self.read_count += 1;
        }
        Ok(next)
    }

    fn open(&mut self, ctx: &ExecutionContext) -> ItemResult<()> {
        let rows = self.store.all();
        let saved = ctx.get_long(&self.count_key()).unwrap_or(0).max(0) as usize;
        let skipped = saved.min(rows.len());
        debug!("cursor '{}' opened over {} records, skipping {}", self.name, rows.len(), skipped);
        let mut cursor = rows.into_iter();
        if skipped > 0 {
            cursor.nth(skipped - 1);
        }
        self.cursor = Some(cursor);
        self.read_count = skipped as u64;
        Ok(())
    }

    fn update(&mut self, ctx: &mut ExecutionContext) {
        ctx.put_long(self.count_key(), self.read_count as i64);
    }

    fn close(&mut self) {
        self.cursor = None;
    }
}

use std::sync::Arc;

use batch_core::{ItemResult, ItemWriter};
use batch_domain::PersonRecord;

use crate::store::InMemoryPersonStore;

/// Inserta cada chunk de `PersonRecord` en el almacén de personas.
///
/// Las inserciones quedan pendientes hasta que el step confirma el chunk,
/// si el step usa el almacén como gestor de transacciones.
pub struct PersonStoreWriter {
    store: Arc<InMemoryPersonStore>,
}

impl PersonStoreWriter {
    pub fn new(store: Arc<InMemoryPersonStore>) -> Self {
        Self { store }
    }
}

impl ItemWriter<PersonRecord> for PersonStoreWriter {
    fn write(&mut self, items: &[PersonRecord]) -> ItemResult<()> {
        self.store.insert_all(items.to_vec());
        Ok(())
    }
}

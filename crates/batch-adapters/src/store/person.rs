use std::sync::{Mutex, MutexGuard, PoisonError};

use batch_core::{ItemError, ItemResult, TransactionManager};
use batch_domain::PersonRecord;

#[derive(Default)]
struct Rows {
    committed: Vec<PersonRecord>,
    pending: Option<Vec<PersonRecord>>,
    next_id: u64,
}

impl Rows {
    fn append(&mut self, records: Vec<PersonRecord>) {
        for mut record in records {
            self.next_id += 1;
            record.id = Some(self.next_id);
            self.committed.push(record);
        }
    }
}

/// Tabla de destino de las copias de personas.
///
/// Los ids (`1..n`, sin huecos) se asignan al confirmar; un chunk descartado
/// no consume ids. Admite una sola transacción activa a la vez: dos steps
/// concurrentes sobre el mismo almacén hacen fallar el segundo `begin`.
#[derive(Default)]
pub struct InMemoryPersonStore {
    rows: Mutex<Rows>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Rows> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dentro de una transacción los registros quedan pendientes y sin id;
    /// fuera, se confirman en el acto.
    pub fn insert_all(&self, records: Vec<PersonRecord>) {
        let mut rows = self.lock();
        match rows.pending.as_mut() {
            Some(pending) => pending.extend(records),
            None => rows.append(records),
        }
    }

    /// Registros confirmados, en orden de inserción.
    pub fn all(&self) -> Vec<PersonRecord> {
        self.lock().committed.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionManager for InMemoryPersonStore {
    fn begin(&self) -> ItemResult<()> {
        let mut rows = self.lock();
        if rows.pending.is_some() {
            return Err(ItemError::failed("person transaction already active"));
        }
        rows.pending = Some(Vec::new());
        Ok(())
    }

    fn commit(&self) -> ItemResult<()> {
        let mut rows = self.lock();
        let pending = rows.pending
                          .take()
                          .ok_or_else(|| ItemError::failed("no active person transaction"))?;
        rows.append(pending);
        Ok(())
    }

    fn rollback(&self) {
        self.lock().pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> PersonRecord {
        PersonRecord { id: None,
                       name: name.into(),
                       age: "30".into(),
                       address: "Seoul".into() }
    }

    #[test]
    fn rolled_back_chunk_does_not_consume_ids() {
        let store = InMemoryPersonStore::new();
        store.begin().unwrap();
        store.insert_all(vec![record("a"), record("b")]);
        assert!(store.is_empty());
        store.rollback();

        store.begin().unwrap();
        store.insert_all(vec![record("c"), record("d")]);
        store.commit().unwrap();
        store.insert_all(vec![record("e")]);

        let ids: Vec<u64> = store.all().iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.all()[0].name, "c");
    }

    #[test]
    fn second_transaction_on_the_same_store_is_rejected() {
        let store = InMemoryPersonStore::new();
        store.begin().unwrap();
        assert!(matches!(store.begin(), Err(ItemError::Failed(_))));
        store.rollback();
        assert!(store.begin().is_ok());
    }
}

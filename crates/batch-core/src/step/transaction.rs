//! Límite transaccional de un chunk (o de una invocación de tasklet).

use crate::errors::ItemResult;

/// Gestor de transacciones usado por los drivers de step.
///
/// `begin` abre la unidad de trabajo del chunk, `commit` la hace durable junto
/// con el estado del reader, `rollback` descarta los efectos del chunk.
pub trait TransactionManager: Send + Sync {
    fn begin(&self) -> ItemResult<()>;
    fn commit(&self) -> ItemResult<()>;
    fn rollback(&self);
}

/// Gestor sin recursos: para writers que ya son atómicos por sí mismos.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResourcelessTransactionManager;

impl TransactionManager for ResourcelessTransactionManager {
    fn begin(&self) -> ItemResult<()> {
        Ok(())
    }

    fn commit(&self) -> ItemResult<()> {
        Ok(())
    }

    fn rollback(&self) {}
}

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use batch_core::{ItemError, ItemResult, TransactionManager};
use batch_domain::{DomainError, Member, MemberRepository};
use log::debug;

/// Cambios de la transacción activa y el siguiente id libre al empezarla.
struct Pending {
    members: BTreeMap<u64, Member>,
    first_id: u64,
}

#[derive(Default)]
struct Tables {
    committed: BTreeMap<u64, Member>,
    pending: Option<Pending>,
    next_id: u64,
}

impl Tables {
    /// Vista con los cambios pendientes de la transacción activa aplicados.
    fn visible(&self) -> BTreeMap<u64, Member> {
        let mut view = self.committed.clone();
        if let Some(pending) = &self.pending {
            view.extend(pending.members.iter().map(|(id, m)| (*id, m.clone())));
        }
        view
    }
}

/// Repositorio de socios en memoria, ordenado por id.
///
/// Fuera de una transacción `save` escribe directamente; dentro, los
/// cambios se acumulan hasta `commit` y un `rollback` devuelve también los
/// ids reservados. Hay una única transacción activa por repositorio.
#[derive(Default)]
pub struct InMemoryMemberRepository {
    tables: Mutex<Tables>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositorio con socios ya persistidos.
    pub fn with_members(members: Vec<Member>) -> Result<Self, DomainError> {
        let repository = Self::new();
        repository.save_all(members)?;
        Ok(repository)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemberRepository for InMemoryMemberRepository {
    fn save(&self, mut member: Member) -> Result<Member, DomainError> {
        if member.name().trim().is_empty() {
            return Err(DomainError::ValidationError("member name is empty".into()));
        }
        let mut guard = self.lock();
        let tables = &mut *guard;
        let id = match member.id() {
            Some(id) => id,
            None => {
                tables.next_id += 1;
                let id = tables.next_id;
                member.assign_id(id);
                id
            }
        };
        match tables.pending.as_mut() {
            Some(pending) => pending.members.insert(id, member.clone()),
            None => tables.committed.insert(id, member.clone()),
        };
        Ok(member)
    }

    fn find_by_id(&self, id: u64) -> Result<Member, DomainError> {
        self.lock().visible().remove(&id).ok_or(DomainError::NotFound(id))
    }

    fn find_all(&self) -> Result<Vec<Member>, DomainError> {
        Ok(self.lock().visible().into_values().collect())
    }

    fn find_page(&self, offset: usize, limit: usize) -> Result<Vec<Member>, DomainError> {
        Ok(self.lock().visible().into_values().skip(offset).take(limit).collect())
    }

    fn count(&self) -> Result<usize, DomainError> {
        Ok(self.lock().visible().len())
    }

    fn delete_all(&self) -> Result<(), DomainError> {
        let mut tables = self.lock();
        tables.committed.clear();
        tables.pending = None;
        Ok(())
    }
}

impl TransactionManager for InMemoryMemberRepository {
    fn begin(&self) -> ItemResult<()> {
        let mut tables = self.lock();
        if tables.pending.is_some() {
            return Err(ItemError::failed("member transaction already active"));
        }
        tables.pending = Some(Pending { members: BTreeMap::new(),
                                        first_id: tables.next_id });
        Ok(())
    }

    fn commit(&self) -> ItemResult<()> {
        let mut tables = self.lock();
        let pending = tables.pending
                            .take()
                            .ok_or_else(|| ItemError::failed("no active member transaction"))?;
        debug!("committing {} member changes", pending.members.len());
        tables.committed.extend(pending.members);
        Ok(())
    }

    fn rollback(&self) {
        let mut tables = self.lock();
        if let Some(discarded) = tables.pending.take() {
            tables.next_id = discarded.first_id;
            debug!("rolled back {} member changes", discarded.members.len());
        }
    }
}

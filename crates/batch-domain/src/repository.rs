use crate::{DomainError, Member};

/// Persistencia de socios.
///
/// `save` asigna id a los socios nuevos y sobrescribe los existentes.
/// `find_page` devuelve socios en orden de id, para lectores paginados.
pub trait MemberRepository: Send + Sync {
    fn save(&self, member: Member) -> Result<Member, DomainError>;

    fn save_all(&self, members: Vec<Member>) -> Result<Vec<Member>, DomainError> {
        members.into_iter().map(|m| self.save(m)).collect()
    }

    fn find_by_id(&self, id: u64) -> Result<Member, DomainError>;

    fn find_all(&self) -> Result<Vec<Member>, DomainError>;

    fn find_page(&self, offset: usize, limit: usize) -> Result<Vec<Member>, DomainError>;

    fn count(&self) -> Result<usize, DomainError>;

    fn delete_all(&self) -> Result<(), DomainError>;
}

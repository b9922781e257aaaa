//! Almacenes en memoria que además actúan como `TransactionManager`: lo
//! escrito entre `begin` y `commit` queda pendiente y `rollback` lo descarta.

pub mod member;
pub mod person;

pub use member::InMemoryMemberRepository;
pub use person::InMemoryPersonStore;

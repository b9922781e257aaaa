// batch-domain library entry point
pub mod error;
pub mod member;
pub mod person;
pub mod repository;
pub use error::DomainError;
pub use member::{Level, Member};
pub use person::{Person, PersonRecord};
pub use repository::MemberRepository;

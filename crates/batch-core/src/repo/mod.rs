pub mod memory;
pub mod types;

pub use memory::InMemoryJobRepository;
pub use types::JobRepository;

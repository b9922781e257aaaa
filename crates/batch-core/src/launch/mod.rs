//! Lanzamiento de jobs: derivación de parámetros (`JobParametersIncrementer`)
//! y `JobLauncher`.

pub mod incrementer;
pub mod launcher;

pub use incrementer::{JobParametersIncrementer, RunIdIncrementer, UniqueRunIdIncrementer};
pub use launcher::JobLauncher;

//! Late binding de parámetros del run.
//!
//! Los componentes que dependen de un parámetro no se construyen al definir
//! el job sino cuando su alcance (job o step) comienza: la definición guarda
//! una fábrica (`LateBound`) y cada ejecución construye su propia instancia a
//! partir de un `ParameterBinder` ligado a esa ejecución.

pub mod binder;
pub mod scope;

pub use binder::{FromJobParameter, ParameterBinder};
pub use scope::{LateBound, Scope, ScopeKind};

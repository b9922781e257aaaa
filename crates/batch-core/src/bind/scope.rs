use std::fmt;

use log::debug;

use super::ParameterBinder;
use crate::errors::BatchError;
use crate::model::{JobExecution, StepExecution};

/// Alcance en el que una fábrica puede construir su componente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Se construye al llegar el job a ese punto (p. ej. un step entero).
    Job,
    /// Se construye al comenzar el step (readers, processors, writers,
    /// tasklets).
    Step,
}

/// Alcance activo en el momento de pedir un componente.
#[derive(Clone, Copy)]
pub enum Scope<'s> {
    Inactive,
    Job(&'s JobExecution),
    Step(&'s JobExecution, &'s StepExecution),
}

impl<'s> Scope<'s> {
    pub fn kind(&self) -> Option<ScopeKind> {
        match self {
            Scope::Inactive => None,
            Scope::Job(_) => Some(ScopeKind::Job),
            Scope::Step(..) => Some(ScopeKind::Step),
        }
    }

    fn binder(&self, required: ScopeKind) -> Option<ParameterBinder<'s>> {
        match (*self, required) {
            (Scope::Inactive, _) => None,
            (Scope::Job(_), ScopeKind::Step) => None,
            (Scope::Job(job), ScopeKind::Job) => Some(ParameterBinder::new(job, None)),
            (Scope::Step(job, step), _) => Some(ParameterBinder::new(job, Some(step))),
        }
    }
}

type Factory<T> = dyn Fn(&ParameterBinder<'_>) -> Result<T, BatchError> + Send + Sync;

/// Fábrica de un componente con alcance de job o de step.
///
/// La definición (job/step) guarda el `LateBound`; cada ejecución llama a
/// `resolve` con su alcance y obtiene una instancia propia, así la misma
/// definición sirve para runs secuenciales o concurrentes con parámetros
/// distintos. Un step-scoped pedido desde el alcance de job, o cualquier
/// componente pedido sin alcance activo, falla con `ScopeUnavailable`.
pub struct LateBound<T> {
    name: String,
    kind: ScopeKind,
    factory: Box<Factory<T>>,
}

impl<T> LateBound<T> {
    pub fn new<F>(name: impl Into<String>, kind: ScopeKind, factory: F) -> Self
        where F: Fn(&ParameterBinder<'_>) -> Result<T, BatchError> + Send + Sync + 'static
    {
        Self { name: name.into(),
               kind,
               factory: Box::new(factory) }
    }

    pub fn step<F>(name: impl Into<String>, factory: F) -> Self
        where F: Fn(&ParameterBinder<'_>) -> Result<T, BatchError> + Send + Sync + 'static
    {
        Self::new(name, ScopeKind::Step, factory)
    }

    pub fn job<F>(name: impl Into<String>, factory: F) -> Self
        where F: Fn(&ParameterBinder<'_>) -> Result<T, BatchError> + Send + Sync + 'static
    {
        Self::new(name, ScopeKind::Job, factory)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Construye una instancia nueva para el alcance activo.
    pub fn resolve(&self, scope: &Scope<'_>) -> Result<T, BatchError> {
        let binder = scope.binder(self.kind)
                          .ok_or_else(|| BatchError::ScopeUnavailable { component: self.name.clone() })?;
        debug!("late_bind component={} kind={:?} step={:?}", self.name, self.kind, binder.step_name());
        (self.factory)(&binder)
    }
}

impl<T> fmt::Debug for LateBound<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LateBound").field("name", &self.name).field("kind", &self.kind).finish()
    }
}

//! Builder para `Job`.
//!
//! Igual que con los pasos de un flujo, el primer step es obligatorio:
//! `Job::builder(name)` devuelve `JobBuilderInit`, que sólo permite
//! configurar hooks o declarar el step inicial con `start`; a partir de ahí
//! `JobBuilder` encadena steps con `next` y termina con `build`.
//!
//! ```ignore
//! let job = Job::builder("memberLevelUpJob")
//!     .incrementer(RunIdIncrementer::default())
//!     .listener(MemberLevelJobListener)
//!     .start(level_up_step)
//!     .build()?;
//! ```

use std::collections::HashSet;

use super::{Job, JobExecutionListener};
use crate::bind::ParameterBinder;
use crate::errors::BatchError;
use crate::launch::JobParametersIncrementer;
use crate::step::{JobScopedStep, Step};

/// Configuración común a los dos estados del builder.
struct JobConfig {
    name: String,
    listeners: Vec<Box<dyn JobExecutionListener>>,
    incrementer: Option<Box<dyn JobParametersIncrementer>>,
    required_parameters: Vec<String>,
}

/// Estado inicial: todavía sin steps.
pub struct JobBuilderInit {
    config: JobConfig,
}

impl JobBuilderInit {
    pub(crate) fn new(name: String) -> Self {
        Self { config: JobConfig { name,
                                   listeners: Vec::new(),
                                   incrementer: None,
                                   required_parameters: Vec::new() } }
    }

    pub fn incrementer<I>(mut self, incrementer: I) -> Self
        where I: JobParametersIncrementer + 'static
    {
        self.config.incrementer = Some(Box::new(incrementer));
        self
    }

    pub fn listener<L>(mut self, listener: L) -> Self
        where L: JobExecutionListener + 'static
    {
        self.config.listeners.push(Box::new(listener));
        self
    }

    /// Parámetro que debe estar presente (tras aplicar el incrementer) para
    /// que el launcher acepte el lanzamiento.
    pub fn required_parameter(mut self, name: impl Into<String>) -> Self {
        self.config.required_parameters.push(name.into());
        self
    }

    /// Declara el primer step.
    pub fn start<S>(self, step: S) -> JobBuilder
        where S: Step + 'static
    {
        JobBuilder { config: self.config,
                     steps: vec![Box::new(step)] }
    }
}

/// Builder con al menos un step declarado.
pub struct JobBuilder {
    config: JobConfig,
    steps: Vec<Box<dyn Step>>,
}

impl JobBuilder {
    /// Añade el siguiente step del flujo lineal.
    pub fn next<S>(mut self, step: S) -> Self
        where S: Step + 'static
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Añade un step que se construye con los parámetros del run al llegar
    /// el job a él.
    pub fn next_late<S, F>(self, name: impl Into<String>, factory: F) -> Self
        where S: Step + 'static,
              F: Fn(&ParameterBinder<'_>) -> Result<S, BatchError> + Send + Sync + 'static
    {
        self.next(JobScopedStep::new(name, factory))
    }

    pub fn listener<L>(mut self, listener: L) -> Self
        where L: JobExecutionListener + 'static
    {
        self.config.listeners.push(Box::new(listener));
        self
    }

    /// Construye el `Job`. Falla si dos steps comparten nombre: el nombre
    /// identifica la `StepExecution` previa al reiniciar.
    pub fn build(self) -> Result<Job, BatchError> {
        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.name()) {
                return Err(BatchError::InvalidConfiguration(format!("job '{}': duplicate step name '{}'",
                                                                    self.config.name,
                                                                    step.name())));
            }
        }
        Ok(Job { name: self.config.name,
                 steps: self.steps,
                 listeners: self.config.listeners,
                 incrementer: self.config.incrementer,
                 required_parameters: self.config.required_parameters })
    }
}

//! Driver de step orientado a chunks.
//!
//! Por cada chunk:
//! 1. `begin` de la transacción.
//! 2. Lee items hasta reunir `chunk_size` items supervivientes o agotar la
//!    entrada; cada item pasa por el processor y un `None` lo descarta
//!    (cuenta como filtrado).
//! 3. Si el chunk no está vacío, una única llamada a `write`.
//! 4. `update` del estado de reader/writer en el contexto del step, `commit`
//!    y aplicación de los contadores a la `StepExecution`.
//!
//! Un error en cualquier etapa revierte el chunk en curso (los contadores de
//! ese chunk no se aplican) y falla el step. Los chunks ya confirmados quedan
//! visibles en la `StepExecution`.

use std::sync::Arc;

use log::{debug, warn};

use super::{ResourcelessTransactionManager, Step, StepContext, TransactionManager};
use crate::bind::{LateBound, ParameterBinder};
use crate::errors::BatchError;
use crate::item::{ItemProcessor, ItemReader, ItemWriter, PassThroughItemProcessor};
use crate::model::{BatchStatus, StepContribution};
use crate::repo::JobRepository;

type ReaderSlot<I> = LateBound<Box<dyn ItemReader<I>>>;
type ProcessorSlot<I, O> = LateBound<Box<dyn ItemProcessor<I, O>>>;
type WriterSlot<O> = LateBound<Box<dyn ItemWriter<O>>>;

pub struct ChunkStep<I, O> {
    name: String,
    chunk_size: usize,
    reader: ReaderSlot<I>,
    processor: ProcessorSlot<I, O>,
    writer: WriterSlot<O>,
    transaction_manager: Arc<dyn TransactionManager>,
    allow_start_if_complete: bool,
}

impl<T: 'static> ChunkStep<T, T> {
    /// Builder de un chunk step; sin `processor` los items pasan tal cual.
    pub fn builder(name: impl Into<String>, chunk_size: usize) -> ChunkStepBuilder<T, T> {
        let name = name.into();
        let processor = LateBound::step(format!("{name}.processor"), |_: &ParameterBinder<'_>| {
            Ok(Box::new(PassThroughItemProcessor) as Box<dyn ItemProcessor<T, T>>)
        });
        ChunkStepBuilder { name,
                           chunk_size,
                           reader: None,
                           processor,
                           writer: None,
                           transaction_manager: Arc::new(ResourcelessTransactionManager),
                           allow_start_if_complete: false }
    }
}

impl<I, O> ChunkStep<I, O> {
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

/// Builder de `ChunkStep`. El processor debe declararse antes que el writer,
/// porque fija el tipo de item que recibe el writer.
pub struct ChunkStepBuilder<I, O> {
    name: String,
    chunk_size: usize,
    reader: Option<ReaderSlot<I>>,
    processor: ProcessorSlot<I, O>,
    writer: Option<WriterSlot<O>>,
    transaction_manager: Arc<dyn TransactionManager>,
    allow_start_if_complete: bool,
}

impl<I: 'static, O: 'static> ChunkStepBuilder<I, O> {
    /// Fábrica del reader; se invoca al comenzar cada ejecución del step.
    pub fn reader<R, F>(mut self, factory: F) -> Self
        where R: ItemReader<I> + 'static,
              F: Fn(&ParameterBinder<'_>) -> Result<R, BatchError> + Send + Sync + 'static
    {
        self.reader = Some(LateBound::step(format!("{}.reader", self.name), move |b: &ParameterBinder<'_>| {
                               factory(b).map(|r| Box::new(r) as Box<dyn ItemReader<I>>)
                           }));
        self
    }

    /// Fábrica del processor (o de la cadena de processors).
    pub fn processor<O2, P, F>(self, factory: F) -> ChunkStepBuilder<I, O2>
        where O2: 'static,
              P: ItemProcessor<I, O2> + 'static,
              F: Fn(&ParameterBinder<'_>) -> Result<P, BatchError> + Send + Sync + 'static
    {
        debug_assert!(self.writer.is_none(), "processor must be declared before writer");
        let processor = LateBound::step(format!("{}.processor", self.name), move |b: &ParameterBinder<'_>| {
            factory(b).map(|p| Box::new(p) as Box<dyn ItemProcessor<I, O2>>)
        });
        ChunkStepBuilder { name: self.name,
                           chunk_size: self.chunk_size,
                           reader: self.reader,
                           processor,
                           writer: None,
                           transaction_manager: self.transaction_manager,
                           allow_start_if_complete: self.allow_start_if_complete }
    }

    /// Fábrica del writer.
    pub fn writer<W, F>(mut self, factory: F) -> Self
        where W: ItemWriter<O> + 'static,
              F: Fn(&ParameterBinder<'_>) -> Result<W, BatchError> + Send + Sync + 'static
    {
        self.writer = Some(LateBound::step(format!("{}.writer", self.name), move |b: &ParameterBinder<'_>| {
                               factory(b).map(|w| Box::new(w) as Box<dyn ItemWriter<O>>)
                           }));
        self
    }

    pub fn transaction_manager(mut self, transaction_manager: Arc<dyn TransactionManager>) -> Self {
        self.transaction_manager = transaction_manager;
        self
    }

    pub fn allow_start_if_complete(mut self, allow: bool) -> Self {
        self.allow_start_if_complete = allow;
        self
    }

    pub fn build(self) -> Result<ChunkStep<I, O>, BatchError> {
        if self.chunk_size == 0 {
            return Err(BatchError::InvalidConfiguration(format!("step '{}': chunk size must be > 0", self.name)));
        }
        let reader = self.reader
                         .ok_or_else(|| BatchError::InvalidConfiguration(format!("step '{}': reader is required", self.name)))?;
        let writer = self.writer
                         .ok_or_else(|| BatchError::InvalidConfiguration(format!("step '{}': writer is required", self.name)))?;
        Ok(ChunkStep { name: self.name,
                       chunk_size: self.chunk_size,
                       reader,
                       processor: self.processor,
                       writer,
                       transaction_manager: self.transaction_manager,
                       allow_start_if_complete: self.allow_start_if_complete })
    }
}

impl<I: 'static, O: 'static> ChunkStep<I, O> {
    fn rollback(&self, ctx: &mut StepContext<'_>) {
        self.transaction_manager.rollback();
        ctx.step_execution_mut().increment_rollback_count();
    }

    fn write_error(&self, chunk_index: usize, item_count: usize, position: u64, message: String) -> BatchError {
        BatchError::ChunkWrite { step: self.name.clone(),
                                 chunk_index,
                                 item_count,
                                 position,
                                 message }
    }

    fn run_chunks(&self,
                  ctx: &mut StepContext<'_>,
                  repository: &dyn JobRepository,
                  reader: &mut dyn ItemReader<I>,
                  processor: &mut dyn ItemProcessor<I, O>,
                  writer: &mut dyn ItemWriter<O>)
                  -> Result<BatchStatus, BatchError> {
        let mut chunk_index = 0usize;
        loop {
            if ctx.is_stop_requested() {
                debug!("chunk_loop:stop step={} committed={}", self.name, chunk_index);
                return Ok(BatchStatus::Stopped);
            }

            self.transaction_manager.begin().map_err(|e| BatchError::Internal(format!("begin transaction: {e}")))?;
            let base = ctx.step_execution().read_count();
            let mut contribution = StepContribution::default();
            let mut chunk: Vec<O> = Vec::with_capacity(self.chunk_size);
            let mut exhausted = false;

            while chunk.len() < self.chunk_size {
                let item = match reader.read() {
                    Ok(Some(item)) => item,
                    Ok(None) => {
                        exhausted = true;
                        break;
                    }
                    Err(e) => {
                        self.rollback(ctx);
                        return Err(BatchError::Reader { step: self.name.clone(),
                                                        position: base + contribution.read_count(),
                                                        message: e.to_string() });
                    }
                };
                contribution.increment_read_count();
                match processor.process(item) {
                    Ok(Some(out)) => chunk.push(out),
                    Ok(None) => contribution.increment_filter_count(),
                    Err(e) => {
                        self.rollback(ctx);
                        return Err(BatchError::Processor { step: self.name.clone(),
                                                           position: base + contribution.read_count(),
                                                           message: e.to_string() });
                    }
                }
            }

            let written = !chunk.is_empty();
            let position = base + contribution.read_count();
            if written {
                if let Err(e) = writer.write(&chunk) {
                    let err = self.write_error(chunk_index, chunk.len(), position, e.to_string());
                    warn!("chunk_write:failed step={} chunk={} items={} err={}", self.name, chunk_index, chunk.len(), e);
                    self.rollback(ctx);
                    return Err(err);
                }
                contribution.increment_write_count(chunk.len() as u64);
            }

            let saved = ctx.step_context().clone();
            reader.update(ctx.step_context_mut());
            writer.update(ctx.step_context_mut());
            if let Err(e) = self.transaction_manager.commit() {
                let err = self.write_error(chunk_index, chunk.len(), position, format!("commit: {e}"));
                ctx.step_context_mut().clone_from(&saved);
                self.rollback(ctx);
                return Err(err);
            }

            ctx.step_execution_mut().apply(&contribution, written);
            repository.update_step_execution(ctx.step_execution());
            if written {
                debug!("chunk_commit step={} chunk={} items={} read={} filtered={}",
                       self.name,
                       chunk_index,
                       chunk.len(),
                       contribution.read_count(),
                       contribution.filter_count());
                chunk_index += 1;
            }

            if exhausted {
                return Ok(BatchStatus::Completed);
            }
        }
    }
}

impl<I: 'static, O: 'static> Step for ChunkStep<I, O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn allow_start_if_complete(&self) -> bool {
        self.allow_start_if_complete
    }

    fn execute(&self, ctx: &mut StepContext<'_>, repository: &dyn JobRepository) -> Result<BatchStatus, BatchError> {
        let (mut reader, mut processor, mut writer) = {
            let scope = ctx.scope();
            (self.reader.resolve(&scope)?, self.processor.resolve(&scope)?, self.writer.resolve(&scope)?)
        };

        let position = ctx.step_execution().read_count();
        reader.open(ctx.step_context())
              .map_err(|e| BatchError::Reader { step: self.name.clone(),
                                                position,
                                                message: format!("open: {e}") })?;
        if let Err(e) = writer.open(ctx.step_context()) {
            reader.close();
            return Err(BatchError::ChunkWrite { step: self.name.clone(),
                                                chunk_index: 0,
                                                item_count: 0,
                                                position,
                                                message: format!("open: {e}") });
        }

        let result = self.run_chunks(ctx, repository, reader.as_mut(), processor.as_mut(), writer.as_mut());
        writer.close();
        reader.close();
        result
    }
}

use log::warn;

use crate::errors::ItemResult;
use crate::model::ExecutionContext;

/// Destino de los chunks.
///
/// `write` recibe el chunk completo y debe ser efectivamente atómico respecto
/// al commit del chunk: si falla, el chunk se revierte y el step falla.
pub trait ItemWriter<T> {
    fn write(&mut self, items: &[T]) -> ItemResult<()>;

    fn open(&mut self, _ctx: &ExecutionContext) -> ItemResult<()> {
        Ok(())
    }

    fn update(&mut self, _ctx: &mut ExecutionContext) {}

    fn close(&mut self) {}
}

impl<T, F> ItemWriter<T> for F where F: FnMut(&[T]) -> ItemResult<()>
{
    fn write(&mut self, items: &[T]) -> ItemResult<()> {
        self(items)
    }
}

/// Decorador que reinvoca el writer con el chunk entero hasta
/// `max_attempts` veces antes de propagar el último error.
pub struct RetryingItemWriter<W> {
    delegate: W,
    max_attempts: usize,
}

impl<W> RetryingItemWriter<W> {
    pub fn new(delegate: W, max_attempts: usize) -> Self {
        Self { delegate,
               max_attempts: max_attempts.max(1) }
    }
}

impl<T, W: ItemWriter<T>> ItemWriter<T> for RetryingItemWriter<W> {
    fn write(&mut self, items: &[T]) -> ItemResult<()> {
        let mut attempt = 1;
        loop {
            match self.delegate.write(items) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.max_attempts => {
                    warn!("chunk write failed (attempt {attempt}/{}): {e}", self.max_attempts);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn open(&mut self, ctx: &ExecutionContext) -> ItemResult<()> {
        self.delegate.open(ctx)
    }

    fn update(&mut self, ctx: &mut ExecutionContext) {
        self.delegate.update(ctx)
    }

    fn close(&mut self) {
        self.delegate.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ItemError;

    #[test]
    fn retrying_writer_recovers_from_transient_failures() {
        let mut calls = 0;
        let flaky = |items: &[u32]| -> ItemResult<()> {
            calls += 1;
            if calls < 3 {
                Err(ItemError::failed("transient"))
            } else {
                assert_eq!(items, &[1, 2]);
                Ok(())
            }
        };
        let mut writer = RetryingItemWriter::new(flaky, 3);
        assert!(writer.write(&[1u32, 2]).is_ok());
    }

    #[test]
    fn retrying_writer_gives_up_after_max_attempts() {
        let mut writer = RetryingItemWriter::new(|_: &[u32]| -> ItemResult<()> { Err(ItemError::failed("down")) }, 2);
        assert_eq!(writer.write(&[1u32]), Err(ItemError::failed("down")));
    }
}

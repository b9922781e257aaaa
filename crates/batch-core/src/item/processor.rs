use std::marker::PhantomData;

use crate::errors::ItemResult;

/// Transforma o filtra un item.
///
/// `Ok(None)` es una decisión de filtrado: el item no llega a las etapas
/// siguientes ni al writer y cuenta en `filter_count`. Debe ser función pura
/// de su entrada salvo que la implementación declare estado explícito
/// (p. ej. `DeduplicatingProcessor`).
pub trait ItemProcessor<I, O> {
    fn process(&mut self, item: I) -> ItemResult<Option<O>>;
}

impl<I, O, F> ItemProcessor<I, O> for F where F: FnMut(I) -> ItemResult<Option<O>>
{
    fn process(&mut self, item: I) -> ItemResult<Option<O>> {
        self(item)
    }
}

/// Processor identidad; es el que usa un chunk step sin processor declarado.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughItemProcessor;

impl<T> ItemProcessor<T, T> for PassThroughItemProcessor {
    fn process(&mut self, item: T) -> ItemResult<Option<T>> {
        Ok(Some(item))
    }
}

/// Encadenamiento tipado de dos processors: la salida de `first` debe ser la
/// entrada de `second` (se comprueba en compilación).
pub struct Chained<A, B, M> {
    first: A,
    second: B,
    _mid: PhantomData<fn(M) -> M>,
}

impl<I, M, O, A, B> ItemProcessor<I, O> for Chained<A, B, M>
    where A: ItemProcessor<I, M>,
          B: ItemProcessor<M, O>
{
    fn process(&mut self, item: I) -> ItemResult<Option<O>> {
        match self.first.process(item)? {
            Some(mid) => self.second.process(mid),
            None => Ok(None),
        }
    }
}

/// Extensión para encadenar processors con `a.then(b)`.
pub trait ItemProcessorExt<I, O>: ItemProcessor<I, O> + Sized {
    fn then<P, O2>(self, next: P) -> Chained<Self, P, O>
        where P: ItemProcessor<O, O2>
    {
        Chained { first: self,
                  second: next,
                  _mid: PhantomData }
    }
}

impl<I, O, P: ItemProcessor<I, O>> ItemProcessorExt<I, O> for P {}

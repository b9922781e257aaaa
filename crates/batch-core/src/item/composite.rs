//! `CompositeItemProcessor`: lista ordenada de delegados vista por el step
//! como un único processor.

use super::ItemProcessor;
use crate::errors::ItemResult;

/// Aplica los delegados en el orden en que se añadieron; el primer `None`
/// corta la cadena para ese item.
pub struct CompositeItemProcessor<T> {
    delegates: Vec<Box<dyn ItemProcessor<T, T>>>,
}

impl<T> CompositeItemProcessor<T> {
    pub fn new() -> Self {
        Self { delegates: Vec::new() }
    }

    /// Añade un delegado al final de la cadena.
    pub fn delegate<P>(mut self, processor: P) -> Self
        where P: ItemProcessor<T, T> + 'static
    {
        self.delegates.push(Box::new(processor));
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl<T> Default for CompositeItemProcessor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemProcessor<T, T> for CompositeItemProcessor<T> {
    fn process(&mut self, item: T) -> ItemResult<Option<T>> {
        let mut current = item;
        for d in self.delegates.iter_mut() {
            match d.process(current)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn filtered_item_does_not_reach_later_delegates() {
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        let mut composite = CompositeItemProcessor::<u32>::new().delegate(|n: u32| -> ItemResult<Option<u32>> {
                                                             Ok(if n % 2 == 0 { Some(n) } else { None })
                                                         })
                                                         .delegate(move |n: u32| -> ItemResult<Option<u32>> {
                                                             counter.set(counter.get() + 1);
                                                             Ok(Some(n * 10))
                                                         });
        assert_eq!(composite.process(3), Ok(None));
        assert_eq!(seen.get(), 0);
        assert_eq!(composite.process(4), Ok(Some(40)));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn empty_composite_passes_items_through() {
        let mut composite = CompositeItemProcessor::<&str>::default();
        assert!(composite.is_empty());
        assert_eq!(composite.process("x"), Ok(Some("x")));
    }
}

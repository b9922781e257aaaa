//! Processor con estado que descarta items con clave repetida.

use std::collections::HashSet;
use std::hash::Hash;

use super::ItemProcessor;
use crate::errors::ItemResult;

/// Filtra items cuya clave (`key_extractor(item)`) ya apareció en esta
/// ejecución de step.
///
/// El pool de claves pertenece a la instancia, que el step construye al
/// comenzar; no se limpia entre chunks, así que la memoria crece con el
/// número de claves distintas. Con `allow_duplicate == true` todos los items
/// pasan sin registrar claves.
pub struct DeduplicatingProcessor<T, K, F>
    where F: Fn(&T) -> K
{
    key_pool: HashSet<K>,
    key_extractor: F,
    allow_duplicate: bool,
    _item: std::marker::PhantomData<fn(&T)>,
}

impl<T, K, F> DeduplicatingProcessor<T, K, F>
    where K: Eq + Hash,
          F: Fn(&T) -> K
{
    /// Rechaza duplicados.
    pub fn new(key_extractor: F) -> Self {
        Self::with_allow_duplicate(key_extractor, false)
    }

    pub fn with_allow_duplicate(key_extractor: F, allow_duplicate: bool) -> Self {
        Self { key_pool: HashSet::new(),
               key_extractor,
               allow_duplicate,
               _item: std::marker::PhantomData }
    }

    /// Claves distintas vistas hasta ahora.
    pub fn seen_keys(&self) -> usize {
        self.key_pool.len()
    }
}

impl<T, K, F> ItemProcessor<T, T> for DeduplicatingProcessor<T, K, F>
    where K: Eq + Hash,
          F: Fn(&T) -> K
{
    fn process(&mut self, item: T) -> ItemResult<Option<T>> {
        if self.allow_duplicate {
            return Ok(Some(item));
        }
        let key = (self.key_extractor)(&item);
        if self.key_pool.insert(key) {
            Ok(Some(item))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: u32, name: &str) -> (u32, String) {
        (id, name.to_string())
    }

    #[test]
    fn second_item_with_same_key_is_filtered() {
        let mut p = DeduplicatingProcessor::new(|s: &(u32, String)| s.1.clone());
        assert_eq!(p.process(person(1, "kim")), Ok(Some(person(1, "kim"))));
        assert_eq!(p.process(person(2, "lee")), Ok(Some(person(2, "lee"))));
        assert_eq!(p.process(person(3, "kim")), Ok(None));
        assert_eq!(p.seen_keys(), 2);
    }

    #[test]
    fn allow_duplicate_passes_everything() {
        let mut p = DeduplicatingProcessor::with_allow_duplicate(|s: &String| s.clone(), true);
        assert_eq!(p.process("a".to_string()), Ok(Some("a".to_string())));
        assert_eq!(p.process("a".to_string()), Ok(Some("a".to_string())));
        assert_eq!(p.seen_keys(), 0);
    }
}

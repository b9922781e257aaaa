use crate::errors::ItemResult;
use crate::model::ExecutionContext;

use super::ItemReader;

/// Reader sobre una lista en memoria.
///
/// Guarda la posición en el contexto del step bajo `<name>.read.count`, así
/// un reinicio continúa tras el último chunk confirmado.
#[derive(Debug, Clone)]
pub struct ListItemReader<T> {
    name: String,
    items: Vec<T>,
    position: usize,
}

impl<T> ListItemReader<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::named("list", items)
    }

    pub fn named(name: impl Into<String>, items: Vec<T>) -> Self {
        Self { name: name.into(),
               items,
               position: 0 }
    }

    fn position_key(&self) -> String {
        format!("{}.read.count", self.name)
    }
}

impl<T: Clone> ItemReader<T> for ListItemReader<T> {
    fn read(&mut self) -> ItemResult<Option<T>> {
        let item = self.items.get(self.position).cloned();
        if item.is_some() {
            self.position += 1;
        }
        Ok(item)
    }

    fn open(&mut self, ctx: &ExecutionContext) -> ItemResult<()> {
        if let Some(saved) = ctx.get_long(&self.position_key()) {
            self.position = usize::try_from(saved).unwrap_or(0).min(self.items.len());
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut ExecutionContext) {
        ctx.put_long(self.position_key(), self.position as i64);
    }
}

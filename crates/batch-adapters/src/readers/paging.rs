use std::collections::VecDeque;
use std::sync::Arc;

use batch_core::{ExecutionContext, ItemReader, ItemResult};
use batch_domain::{Member, MemberRepository};
use log::debug;

use crate::item_error;

/// Lee socios en páginas de `page_size` ordenadas por id.
///
/// Pide una página nueva sólo cuando la anterior se ha consumido. El número
/// de socios entregados se guarda como `<name>.read.count` y en un reinicio
/// es el offset desde el que se continúa.
pub struct MemberPagingReader {
    name: String,
    repository: Arc<dyn MemberRepository>,
    page_size: usize,
    buffer: VecDeque<Member>,
    offset: usize,
    read_count: usize,
    exhausted: bool,
}

impl MemberPagingReader {
    pub fn new(name: impl Into<String>, repository: Arc<dyn MemberRepository>, page_size: usize) -> Self {
        Self { name: name.into(),
               repository,
               page_size: page_size.max(1),
               buffer: VecDeque::new(),
               offset: 0,
               read_count: 0,
               exhausted: false }
    }

    fn count_key(&self) -> String {
        format!("{}.read.count", self.name)
    }

    fn fetch_page(&mut self) -> ItemResult<()> {
        let page = self.repository.find_page(self.offset, self.page_size).map_err(item_error)?;
        debug!("reader '{}' fetched {} members at offset {}", self.name, page.len(), self.offset);
        self.exhausted = page.len() < self.page_size;
        self.offset += page.len();
        self.buffer.extend(page);
        Ok(())
    }
}

impl ItemReader<Member> for MemberPagingReader {
    fn read(&mut self) -> ItemResult<Option<Member>> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page()?;
        }
        let next = self.buffer.pop_front();
        if next.is_some() {
            self.read_count += 1;
        }
        Ok(next)
    }

    fn open(&mut self, ctx: &ExecutionContext) -> ItemResult<()> {
        let saved = ctx.get_long(&self.count_key()).unwrap_or(0).max(0) as usize;
        self.buffer.clear();
        self.offset = saved;
        self.read_count = saved;
        self.exhausted = false;
        Ok(())
    }

    fn update(&mut self, ctx: &mut ExecutionContext) {
        ctx.put_long(self.count_key(), self.read_count as i64);
    }
}

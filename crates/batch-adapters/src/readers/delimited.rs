//! Reader de ficheros de texto delimitados (CSV y similares) sobre `csv`.
//!
//! Cada registro se nombra con la lista de campos declarada en el builder y
//! el `FieldSet` resultante se convierte en item con el mapper. El número de
//! registros leídos se guarda en el contexto del step bajo
//! `<name>.read.count`.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use batch_core::{BatchError, ExecutionContext, ItemError, ItemReader, ItemResult};
use csv::{ErrorKind, Reader, ReaderBuilder, StringRecord};
use log::debug;

/// Campos de un registro, accesibles por nombre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    names: Arc<[String]>,
    values: Vec<String>,
}

impl FieldSet {
    pub fn new(names: Arc<[String]>, values: Vec<String>) -> Self {
        Self { names, values }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn read_string(&self, name: &str) -> ItemResult<&str> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .ok_or_else(|| ItemError::Parse(format!("unknown field '{name}'")))
    }

    /// Parsea el campo (recortado) como `T`.
    pub fn read_parsed<T>(&self, name: &str) -> ItemResult<T>
        where T: FromStr,
              T::Err: std::fmt::Display
    {
        let raw = self.read_string(name)?;
        raw.trim()
           .parse()
           .map_err(|e| ItemError::Parse(format!("field '{name}' = '{raw}': {e}")))
    }
}

fn csv_error(e: csv::Error) -> ItemError {
    match e.kind() {
        ErrorKind::Io(_) => ItemError::Io(e.to_string()),
        _ => ItemError::Parse(e.to_string()),
    }
}

/// Línea en blanco (o sólo espacios): `csv` la entrega como un único campo.
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}

type Mapper<T> = Arc<dyn Fn(&FieldSet) -> ItemResult<T> + Send + Sync>;

#[derive(Clone)]
enum Source {
    Path(PathBuf),
    Text(Arc<str>),
}

impl Source {
    fn open(&self) -> ItemResult<Box<dyn Read>> {
        match self {
            Source::Path(p) => {
                let file = File::open(p).map_err(|e| ItemError::Io(format!("{}: {e}", p.display())))?;
                Ok(Box::new(file))
            }
            Source::Text(t) => Ok(Box::new(Cursor::new(t.as_bytes().to_vec()))),
        }
    }
}

pub struct DelimitedFileReader<T> {
    name: String,
    source: Source,
    delimiter: u8,
    names: Arc<[String]>,
    lines_to_skip: usize,
    mapper: Mapper<T>,
    records: Option<Reader<Box<dyn Read>>>,
    item_count: u64,
}

impl<T> DelimitedFileReader<T> {
    pub fn builder(name: impl Into<String>) -> DelimitedFileReaderBuilder<T> {
        DelimitedFileReaderBuilder { name: name.into(),
                                     source: None,
                                     delimiter: b',',
                                     names: Vec::new(),
                                     lines_to_skip: 0,
                                     mapper: None }
    }

    fn count_key(&self) -> String {
        format!("{}.read.count", self.name)
    }

    /// Siguiente registro no vacío, o `None` al final de la entrada.
    fn next_record(&mut self) -> ItemResult<Option<StringRecord>> {
        let Some(records) = self.records.as_mut() else {
            return Err(ItemError::failed(format!("reader '{}' is not open", self.name)));
        };
        let mut record = StringRecord::new();
        loop {
            if !records.read_record(&mut record).map_err(csv_error)? {
                return Ok(None);
            }
            if !is_blank(&record) {
                return Ok(Some(record));
            }
        }
    }

    fn map_record(&self, record: &StringRecord) -> ItemResult<T> {
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != self.names.len() {
            return Err(ItemError::Parse(format!("line {line}: expected {} fields, found {}",
                                                self.names.len(),
                                                record.len())));
        }
        let values = record.iter().map(str::to_string).collect();
        (self.mapper)(&FieldSet::new(self.names.clone(), values)).map_err(|e| match e {
            ItemError::Parse(m) => ItemError::Parse(format!("line {line}: {m}")),
            other => other,
        })
    }
}

impl<T> ItemReader<T> for DelimitedFileReader<T> {
    fn read(&mut self) -> ItemResult<Option<T>> {
        match self.next_record()? {
            Some(record) => {
                let item = self.map_record(&record)?;
                self.item_count += 1;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn open(&mut self, ctx: &ExecutionContext) -> ItemResult<()> {
        let mut records = ReaderBuilder::new().has_headers(false)
                                              .flexible(true)
                                              .delimiter(self.delimiter)
                                              .from_reader(self.source.open()?);
        let mut header = StringRecord::new();
        for _ in 0..self.lines_to_skip {
            if !records.read_record(&mut header).map_err(csv_error)? {
                break;
            }
        }
        self.records = Some(records);
        self.item_count = 0;

        // Reinicio: saltar los registros ya confirmados.
        let saved = ctx.get_long(&self.count_key()).unwrap_or(0).max(0) as u64;
        while self.item_count < saved {
            if self.next_record()?.is_none() {
                break;
            }
            self.item_count += 1;
        }
        if saved > 0 {
            debug!("reader '{}' resumed after {} records", self.name, self.item_count);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut ExecutionContext) {
        ctx.put_long(self.count_key(), self.item_count as i64);
    }

    fn close(&mut self) {
        self.records = None;
    }
}

pub struct DelimitedFileReaderBuilder<T> {
    name: String,
    source: Option<Source>,
    delimiter: u8,
    names: Vec<String>,
    lines_to_skip: usize,
    mapper: Option<Mapper<T>>,
}

impl<T> DelimitedFileReaderBuilder<T> {
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(Source::Path(path.into()));
        self
    }

    /// Contenido en memoria en lugar de un fichero.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(Source::Text(Arc::from(text.into())));
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn names(mut self, names: &[&str]) -> Self {
        self.names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Registros de cabecera que se descartan al abrir.
    pub fn lines_to_skip(mut self, n: usize) -> Self {
        self.lines_to_skip = n;
        self
    }

    pub fn mapper<F>(mut self, mapper: F) -> Self
        where F: Fn(&FieldSet) -> ItemResult<T> + Send + Sync + 'static
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    pub fn build(self) -> Result<DelimitedFileReader<T>, BatchError> {
        let source = self.source
                         .ok_or_else(|| BatchError::InvalidConfiguration(format!("reader '{}' has no source", self.name)))?;
        let mapper = self.mapper
                         .ok_or_else(|| BatchError::InvalidConfiguration(format!("reader '{}' has no mapper", self.name)))?;
        if self.names.is_empty() {
            return Err(BatchError::InvalidConfiguration(format!("reader '{}' declares no field names", self.name)));
        }
        Ok(DelimitedFileReader { name: self.name,
                                 source,
                                 delimiter: self.delimiter,
                                 names: self.names.into(),
                                 lines_to_skip: self.lines_to_skip,
                                 mapper,
                                 records: None,
                                 item_count: 0 })
    }
}

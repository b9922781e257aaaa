use std::fmt;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_NAME: &str = "UNKNOWN";

/// Persona tal como llega de la fuente (lista o fichero delimitado).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub age: String,
    pub address: String,
}

impl Person {
    pub fn new(id: u64, name: impl Into<String>, age: impl Into<String>, address: impl Into<String>) -> Self {
        Person { id,
                 name: name.into(),
                 age: age.into(),
                 address: address.into() }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<person #{}: {}, {}, {}>", self.id, self.name, self.age, self.address)
    }
}

/// Copia de una `Person` en el almacén de destino; el id lo asigna el
/// almacén.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: Option<u64>,
    pub name: String,
    pub age: String,
    pub address: String,
}

impl PersonRecord {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Sustituye el nombre por `UNKNOWN`.
    pub fn with_unknown_name(mut self) -> Self {
        self.name = UNKNOWN_NAME.to_string();
        self
    }
}

impl fmt::Display for PersonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<person record #{id}: {}, {}, {}>", self.name, self.age, self.address),
            None => write!(f, "<person record: {}, {}, {}>", self.name, self.age, self.address),
        }
    }
}

impl From<&Person> for PersonRecord {
    fn from(p: &Person) -> Self {
        PersonRecord { id: None,
                       name: p.name.clone(),
                       age: p.age.clone(),
                       address: p.address.clone() }
    }
}

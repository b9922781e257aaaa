use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::errors::BatchError;

/// Almacén clave/valor con alcance de job o de step.
///
/// El mismo tipo sirve para ambos alcances; lo que cambia es su dueño:
/// `JobExecution::execution_context` vive toda la ejecución del job y lo ven
/// todos sus steps, `StepExecution::execution_context` sólo lo ve su step.
/// Leer una clave no escrita devuelve `None` (o el default del caller).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    entries: BTreeMap<String, Value>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_value(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put_value(key, Value::String(value.into()));
    }

    pub fn put_long(&mut self, key: impl Into<String>, value: i64) {
        self.put_value(key, Value::from(value));
    }

    pub fn put_double(&mut self, key: impl Into<String>, value: f64) {
        self.put_value(key, Value::from(value));
    }

    /// Guarda cualquier valor serializable.
    pub fn put<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<(), BatchError> {
        let v = serde_json::to_value(value).map_err(|e| BatchError::Internal(format!("context serialization: {e}")))?;
        self.put_value(key, v);
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or(default).to_string()
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.entries.get(key).and_then(Value::as_i64)
    }

    pub fn get_long_or(&self, key: &str, default: i64) -> i64 {
        self.get_long(key).unwrap_or(default)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.entries.get(key).and_then(Value::as_f64)
    }

    /// Decodifica el valor guardado; `None` si falta o no encaja en `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

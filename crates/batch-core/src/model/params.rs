//! `JobParameters`: mapa ordenado nombre -> valor tipado.
//!
//! Sólo los parámetros identificadores participan en la identidad de la
//! `JobInstance` (`job_key`). El orden de inserción se conserva para mostrar
//! los parámetros tal como se declararon, pero no afecta al `job_key`.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::BatchError;
use crate::hashing::hash_value;

/// Valor tipado de un parámetro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    String(String),
    Long(i64),
    Double(f64),
    Date(NaiveDate),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::String(_) => "string",
            ParamValue::Long(_) => "long",
            ParamValue::Double(_) => "double",
            ParamValue::Date(_) => "date",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ParamValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            ParamValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ParamValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    fn parse_typed(type_name: &str, raw: &str) -> Result<Self, BatchError> {
        let invalid = |why: String| BatchError::InvalidParameters(format!("'{raw}' is not a valid {type_name}: {why}"));
        match type_name {
            "string" => Ok(ParamValue::String(raw.to_string())),
            "long" => raw.parse().map(ParamValue::Long).map_err(|e| invalid(e.to_string())),
            "double" => raw.parse().map(ParamValue::Double).map_err(|e| invalid(e.to_string())),
            "date" => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(ParamValue::Date)
                                                                .map_err(|e| invalid(e.to_string())),
            other => Err(BatchError::InvalidParameters(format!("unknown parameter type '{other}'"))),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => write!(f, "{s}"),
            ParamValue::Long(v) => write!(f, "{v}"),
            ParamValue::Double(v) => write!(f, "{v}"),
            ParamValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Un parámetro junto con su marca de identificador.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobParameter {
    pub value: ParamValue,
    pub identifying: bool,
}

impl JobParameter {
    pub fn identifying(value: ParamValue) -> Self {
        Self { value, identifying: true }
    }

    pub fn non_identifying(value: ParamValue) -> Self {
        Self { value, identifying: false }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobParameters {
    params: IndexMap<String, JobParameter>,
}

impl JobParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Añade (o reemplaza) un parámetro.
    pub fn with(mut self, name: impl Into<String>, parameter: JobParameter) -> Self {
        self.params.insert(name.into(), parameter);
        self
    }

    pub fn with_string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, JobParameter::identifying(ParamValue::String(value.into())))
    }

    pub fn with_long(self, name: impl Into<String>, value: i64) -> Self {
        self.with(name, JobParameter::identifying(ParamValue::Long(value)))
    }

    pub fn with_double(self, name: impl Into<String>, value: f64) -> Self {
        self.with(name, JobParameter::identifying(ParamValue::Double(value)))
    }

    pub fn with_date(self, name: impl Into<String>, value: NaiveDate) -> Self {
        self.with(name, JobParameter::identifying(ParamValue::Date(value)))
    }

    /// Parámetro que no cuenta para la identidad de la instancia.
    pub fn with_non_identifying(self, name: impl Into<String>, value: ParamValue) -> Self {
        self.with(name, JobParameter::non_identifying(value))
    }

    pub fn get(&self, name: &str) -> Option<&JobParameter> {
        self.params.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name).map(|p| &p.value)
    }

    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(ParamValue::as_str)
    }

    pub fn get_string_or(&self, name: &str, default: &str) -> String {
        self.get_string(name).unwrap_or(default).to_string()
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(ParamValue::as_long)
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(ParamValue::as_double)
    }

    pub fn get_date(&self, name: &str) -> Option<NaiveDate> {
        self.value(name).and_then(ParamValue::as_date)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JobParameter)> {
        self.params.iter()
    }

    /// Subconjunto identificador (en orden de inserción).
    pub fn identifying(&self) -> JobParameters {
        let params = self.params
                         .iter()
                         .filter(|(_, p)| p.identifying)
                         .map(|(k, p)| (k.clone(), p.clone()))
                         .collect();
        JobParameters { params }
    }

    /// Devuelve `self` con los parámetros de `overrides` aplicados encima.
    pub fn merged_with(&self, overrides: &JobParameters) -> JobParameters {
        let mut params = self.params.clone();
        for (k, p) in overrides.params.iter() {
            params.insert(k.clone(), p.clone());
        }
        JobParameters { params }
    }

    /// Clave de identidad: hash del JSON canónico de los parámetros
    /// identificadores. No depende del orden de inserción.
    pub fn job_key(&self) -> String {
        let map: serde_json::Map<String, Value> =
            self.params
                .iter()
                .filter(|(_, p)| p.identifying)
                .map(|(k, p)| (k.clone(), json!({"type": p.value.type_name(), "value": p.value.to_string()})))
                .collect();
        hash_value(&Value::Object(map))
    }

    /// Parsea un token `[-]name[(type)]=value`.
    ///
    /// El prefijo `-` marca el parámetro como no identificador; el tipo por
    /// defecto es `string`.
    pub fn parse_token(token: &str) -> Result<(String, JobParameter), BatchError> {
        let (lhs, raw) = token.split_once('=')
                              .ok_or_else(|| BatchError::InvalidParameters(format!("expected name=value, got '{token}'")))?;
        let (identifying, lhs) = match lhs.strip_prefix('-') {
            Some(rest) => (false, rest),
            None => (true, lhs),
        };
        let (name, type_name) = match lhs.split_once('(') {
            Some((name, rest)) => {
                let t = rest.strip_suffix(')')
                            .ok_or_else(|| BatchError::InvalidParameters(format!("unclosed type in '{token}'")))?;
                (name, t)
            }
            None => (lhs, "string"),
        };
        if name.is_empty() {
            return Err(BatchError::InvalidParameters(format!("empty parameter name in '{token}'")));
        }
        let value = ParamValue::parse_typed(&type_name.to_lowercase(), raw)?;
        Ok((name.to_string(), JobParameter { value, identifying }))
    }

    /// Construye parámetros a partir de tokens de línea de comandos.
    pub fn from_args<I, S>(args: I) -> Result<Self, BatchError>
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        let mut out = JobParameters::new();
        for arg in args {
            let (name, parameter) = Self::parse_token(arg.as_ref())?;
            out.params.insert(name, parameter);
        }
        Ok(out)
    }
}

impl fmt::Display for JobParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.params
                                     .iter()
                                     .map(|(k, p)| format!("{}{}={}", if p.identifying { "" } else { "-" }, k, p.value))
                                     .collect();
        write!(f, "{{{}}}", items.join(", "))
    }
}

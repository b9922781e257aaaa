// member.rs
use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Nivel de un socio. El orden de declaración es el orden de progresión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    #[default]
    Normal,
    Silver,
    Gold,
    Vip,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Normal, Level::Silver, Level::Gold, Level::Vip];

    /// Importe acumulado a partir del cual se sube desde este nivel.
    /// `None` en el nivel máximo.
    pub fn next_amount(self) -> Option<u64> {
        match self {
            Level::Normal => Some(200_000),
            Level::Silver => Some(300_000),
            Level::Gold => Some(500_000),
            Level::Vip => None,
        }
    }

    pub fn next_level(self) -> Option<Level> {
        match self {
            Level::Normal => Some(Level::Silver),
            Level::Silver => Some(Level::Gold),
            Level::Gold => Some(Level::Vip),
            Level::Vip => None,
        }
    }

    /// Nivel más alto que alcanza un importe, partiendo de `Normal` y
    /// encadenando umbrales (450 000 -> `Gold`).
    pub fn highest_for(total_amount: u64) -> Level {
        let mut level = Level::Normal;
        while let (Some(threshold), Some(next)) = (level.next_amount(), level.next_level()) {
            if total_amount < threshold {
                break;
            }
            level = next;
        }
        level
    }

    /// Si un socio en este nivel con ese importe puede subir.
    pub fn available_level_up(self, total_amount: u64) -> bool {
        self.next_amount().is_some_and(|threshold| total_amount >= threshold)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Normal => "NORMAL",
            Level::Silver => "SILVER",
            Level::Gold => "GOLD",
            Level::Vip => "VIP",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL.into_iter()
                  .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
                  .ok_or_else(|| DomainError::ValidationError(format!("Nivel desconocido: {s}")))
    }
}

/// Socio con importe acumulado y nivel.
///
/// El nivel sólo cambia mediante `promote`/`promote_at` y nunca baja.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: Option<u64>,
    name: String,
    total_amount: u64,
    level: Level,
    updated_date: Option<NaiveDate>,
}

impl Member {
    /// Socio nuevo en `Normal`, todavía sin id asignado por el repositorio.
    pub fn new(name: impl Into<String>, total_amount: u64) -> Self {
        Self::with_level(name, total_amount, Level::Normal)
    }

    pub fn with_level(name: impl Into<String>, total_amount: u64, level: Level) -> Self {
        Member { id: None,
                 name: name.into(),
                 total_amount,
                 level,
                 updated_date: None }
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn updated_date(&self) -> Option<NaiveDate> {
        self.updated_date
    }

    /// Lo usa el repositorio al persistir por primera vez.
    pub fn assign_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    pub fn eligible_for_promotion(&self) -> bool {
        self.level.available_level_up(self.total_amount)
    }

    /// Sube al nivel más alto que permite el importe y fija `updated_date`.
    /// Si el importe no da para subir (o ya es `Vip`) no cambia nada.
    pub fn promote_at(&mut self, date: NaiveDate) -> Level {
        let target = Level::highest_for(self.total_amount);
        if target > self.level {
            self.level = target;
            self.updated_date = Some(date);
        }
        self.level
    }

    pub fn promote(&mut self) -> Level {
        self.promote_at(Local::now().date_naive())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<member #{id}: {}, {}, {}>", self.name, self.total_amount, self.level),
            None => write!(f, "<member: {}, {}, {}>", self.name, self.total_amount, self.level),
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Estado de una `JobExecution` o `StepExecution`.
///
/// Transiciones válidas:
/// - `Starting` -> `Started`
/// - `Started` -> `Completed` | `Failed` | `Stopped`
///
/// Los tres últimos son terminales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Starting,
    Started,
    Completed,
    Failed,
    Stopped,
}

impl BatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchStatus::Completed | BatchStatus::Failed | BatchStatus::Stopped)
    }

    pub fn is_running(self) -> bool {
        matches!(self, BatchStatus::Starting | BatchStatus::Started)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchStatus::Starting => "STARTING",
            BatchStatus::Started => "STARTED",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Failed => "FAILED",
            BatchStatus::Stopped => "STOPPED",
        };
        f.write_str(s)
    }
}

/// Señal devuelta por un tasklet en cada invocación.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatStatus {
    /// El driver vuelve a invocar el tasklet.
    Continuable,
    /// El step termina.
    Finished,
}

impl RepeatStatus {
    pub fn continue_if(condition: bool) -> Self {
        if condition {
            RepeatStatus::Continuable
        } else {
            RepeatStatus::Finished
        }
    }

    pub fn is_continuable(self) -> bool {
        self == RepeatStatus::Continuable
    }
}

use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// AlertLevel — Tri-state spend severity
// ---------------------------------------------------------------------------

/// Severity of spending against a budget.
///
/// On the wire the service uses `seguro` / `advertencia` / `peligro`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    #[serde(rename = "seguro")]
    Normal,
    #[serde(rename = "advertencia")]
    Warning,
    #[serde(rename = "peligro")]
    Danger,
}

impl AlertLevel {
    /// Fill color used for a bar in the comparison chart.
    pub fn color(self) -> &'static str {
        match self {
            Self::Normal => config::NORMAL_COLOR,
            Self::Warning => config::WARNING_COLOR,
            Self::Danger => config::DANGER_COLOR,
        }
    }

    /// Same hue as [`color`](Self::color) at full opacity, for bar borders.
    pub fn border_color(self) -> String {
        self.color().replace("0.8", "1")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

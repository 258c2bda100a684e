use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::alert::AlertLevel;

// ---------------------------------------------------------------------------
// Summary — Server-computed financial overview
// ---------------------------------------------------------------------------

/// Headline figures for the signed-in user. Computed remotely; the client
/// only displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "total_general")]
    pub total_spent: Decimal,
    #[serde(rename = "por_categoria", default)]
    pub by_category: BTreeMap<String, Decimal>,
    #[serde(rename = "presupuesto_limite")]
    pub budget_limit: Decimal,
    #[serde(rename = "saldo_disponible")]
    pub available: Decimal,
    #[serde(rename = "porcentaje_usado")]
    pub percent_used: Decimal,
    #[serde(rename = "nivel_alerta")]
    pub alert_level: AlertLevel,
    #[serde(rename = "balance_neto")]
    pub net_balance: Decimal,
}

impl Summary {
    /// Percent used rounded to a whole number for the progress gauge.
    pub fn gauge_percent(&self) -> Decimal {
        self.percent_used
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// The alert banner is only shown once the budget is exceeded.
    pub fn shows_alert_banner(&self) -> bool {
        self.alert_level == AlertLevel::Danger
    }
}

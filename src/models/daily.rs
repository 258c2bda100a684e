use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// DailyTotals — Spend per calendar day, oldest first
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDaily", into = "RawDaily")]
pub struct DailyTotals {
    dates: Vec<NaiveDate>,
    amounts: Vec<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDaily {
    #[serde(rename = "fechas", default)]
    dates: Vec<NaiveDate>,
    #[serde(rename = "totales", default)]
    amounts: Vec<Decimal>,
}

impl TryFrom<RawDaily> for DailyTotals {
    type Error = DashboardError;

    fn try_from(raw: RawDaily) -> Result<Self> {
        Self::new(raw.dates, raw.amounts)
    }
}

impl From<DailyTotals> for RawDaily {
    fn from(d: DailyTotals) -> Self {
        Self {
            dates: d.dates,
            amounts: d.amounts,
        }
    }
}

impl DailyTotals {
    /// Dates are taken in the order given; the service already sorts them.
    pub fn new(dates: Vec<NaiveDate>, amounts: Vec<Decimal>) -> Result<Self> {
        if dates.len() != amounts.len() {
            return Err(DashboardError::InvalidArgument(format!(
                "Daily totals are misaligned: {} dates, {} amounts",
                dates.len(),
                amounts.len()
            )));
        }
        Ok(Self { dates, amounts })
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn amounts(&self) -> &[Decimal] {
        &self.amounts
    }

    pub fn days(&self) -> impl Iterator<Item = DailyTotal> + '_ {
        self.dates
            .iter()
            .zip(&self.amounts)
            .map(|(date, amount)| DailyTotal {
                date: *date,
                amount: *amount,
            })
    }
}

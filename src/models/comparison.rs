use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// BudgetComparison — Actual vs suggested spend per category
// ---------------------------------------------------------------------------

/// Parallel category / actual / suggested arrays, guaranteed equal length.
///
/// The service sends three index-aligned arrays; decoding fails if their
/// lengths differ, so every consumer can rely on alignment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawComparison", into = "RawComparison")]
pub struct BudgetComparison {
    categories: Vec<String>,
    actual: Vec<Decimal>,
    suggested: Vec<Decimal>,
}

/// One index of a [`BudgetComparison`].
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAggregate {
    pub category: String,
    pub actual_spend: Decimal,
    pub suggested_budget: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawComparison {
    #[serde(rename = "categorias", default)]
    categories: Vec<String>,
    #[serde(rename = "gastos_reales", default)]
    actual: Vec<Decimal>,
    #[serde(rename = "presupuesto_sugerido", default)]
    suggested: Vec<Decimal>,
}

impl TryFrom<RawComparison> for BudgetComparison {
    type Error = DashboardError;

    fn try_from(raw: RawComparison) -> Result<Self> {
        Self::new(raw.categories, raw.actual, raw.suggested)
    }
}

impl From<BudgetComparison> for RawComparison {
    fn from(c: BudgetComparison) -> Self {
        Self {
            categories: c.categories,
            actual: c.actual,
            suggested: c.suggested,
        }
    }
}

impl BudgetComparison {
    pub fn new(categories: Vec<String>, actual: Vec<Decimal>, suggested: Vec<Decimal>) -> Result<Self> {
        if categories.len() != actual.len() || actual.len() != suggested.len() {
            return Err(DashboardError::InvalidArgument(format!(
                "Budget comparison arrays are misaligned: {} categories, {} actual, {} suggested",
                categories.len(),
                actual.len(),
                suggested.len()
            )));
        }
        Ok(Self {
            categories,
            actual,
            suggested,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn actual(&self) -> &[Decimal] {
        &self.actual
    }

    pub fn suggested(&self) -> &[Decimal] {
        &self.suggested
    }

    pub fn rows(&self) -> impl Iterator<Item = CategoryAggregate> + '_ {
        self.categories
            .iter()
            .zip(&self.actual)
            .zip(&self.suggested)
            .map(|((category, actual), suggested)| CategoryAggregate {
                category: category.clone(),
                actual_spend: *actual,
                suggested_budget: *suggested,
            })
    }
}

//! Budget risk classification.
//!
//! Each category's spend is compared with its suggested budget:
//!
//! | ratio `actual / suggested` | level     |
//! |----------------------------|-----------|
//! | `>= 1.0`                   | `Danger`  |
//! | `>= 0.8` and `< 1.0`       | `Warning` |
//! | `< 0.8`                    | `Normal`  |
//!
//! A suggested budget of exactly zero has no ratio. Any positive spend
//! against it is `Danger`; no spend is `Normal`. Every other budget,
//! negative ones included, goes through the ratio.

use rust_decimal::Decimal;

use crate::error::{DashboardError, Result};
use crate::models::{AlertLevel, BudgetComparison};

/// Ratio at which a category turns `Warning`.
pub const WARNING_RATIO: Decimal = Decimal::from_parts(8, 0, 0, false, 1);
/// Ratio at which a category turns `Danger`.
pub const DANGER_RATIO: Decimal = Decimal::ONE;

pub fn classify(actual: Decimal, suggested: Decimal) -> AlertLevel {
    if suggested.is_zero() {
        return if actual > Decimal::ZERO {
            AlertLevel::Danger
        } else {
            AlertLevel::Normal
        };
    }

    // Overflow only happens for an enormous ratio.
    let Some(ratio) = actual.checked_div(suggested) else {
        return AlertLevel::Danger;
    };

    if ratio >= DANGER_RATIO {
        AlertLevel::Danger
    } else if ratio >= WARNING_RATIO {
        AlertLevel::Warning
    } else {
        AlertLevel::Normal
    }
}

/// Classify index-aligned series. Fails if the lengths differ.
pub fn classify_all(actual: &[Decimal], suggested: &[Decimal]) -> Result<Vec<AlertLevel>> {
    if actual.len() != suggested.len() {
        return Err(DashboardError::InvalidArgument(format!(
            "Cannot classify {} actual values against {} budgets",
            actual.len(),
            suggested.len()
        )));
    }
    Ok(actual
        .iter()
        .zip(suggested)
        .map(|(a, s)| classify(*a, *s))
        .collect())
}

pub fn classify_comparison(comparison: &BudgetComparison) -> Vec<AlertLevel> {
    comparison
        .rows()
        .map(|row| classify(row.actual_spend, row.suggested_budget))
        .collect()
}

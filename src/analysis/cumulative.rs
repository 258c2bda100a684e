//! Running totals for the spending trend chart.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{DashboardError, Result};
use crate::models::DailyTotals;

/// Prefix sums of a chronological series plus its grand total.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CumulativeSeries {
    /// `running[i]` is the sum of inputs `0..=i`.
    pub running: Vec<Decimal>,
    pub total: Decimal,
}

impl CumulativeSeries {
    /// Input order is kept as given; it is never re-sorted. Fails if a sum
    /// leaves the `Decimal` range.
    pub fn build(amounts: &[Decimal]) -> Result<Self> {
        Ok(Self {
            running: running_totals(amounts)?,
            total: grand_total(amounts)?,
        })
    }

    pub fn from_daily(daily: &DailyTotals) -> Result<Self> {
        Self::build(daily.amounts())
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

fn overflow() -> DashboardError {
    DashboardError::InvalidArgument("Daily totals overflow the supported amount range".into())
}

pub fn running_totals(amounts: &[Decimal]) -> Result<Vec<Decimal>> {
    let mut acc = Decimal::ZERO;
    amounts
        .iter()
        .map(|amount| -> Result<Decimal> {
            acc = acc.checked_add(*amount).ok_or_else(overflow)?;
            Ok(acc)
        })
        .collect()
}

pub fn grand_total(amounts: &[Decimal]) -> Result<Decimal> {
    amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
        .ok_or_else(overflow)
}

/// (date, cumulative amount) pairs for the trend chart.
pub fn trend_points(daily: &DailyTotals) -> Result<Vec<(NaiveDate, Decimal)>> {
    Ok(daily
        .dates()
        .iter()
        .copied()
        .zip(running_totals(daily.amounts())?)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    #[test]
    fn example_series() {
        let series = CumulativeSeries::build(&ds(&[10, 0, 5])).unwrap();
        assert_eq!(series.running, ds(&[10, 10, 15]));
        assert_eq!(series.total, Decimal::from(15));
    }

    #[test]
    fn empty_input() {
        let series = CumulativeSeries::build(&[]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.total, Decimal::ZERO);
    }

    #[test]
    fn each_element_is_prefix_sum() {
        let input = ds(&[3, -2, 7, 0, 11, -4]);
        let running = running_totals(&input).unwrap();
        assert_eq!(running.len(), input.len());
        for (i, value) in running.iter().enumerate() {
            assert_eq!(*value, grand_total(&input[..=i]).unwrap());
        }
    }

    #[test]
    fn non_negative_input_never_decreases() {
        let running = running_totals(&ds(&[4, 0, 0, 9, 1])).unwrap();
        assert!(running.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn final_running_value_matches_total() {
        let input = vec![Decimal::new(1050, 2), Decimal::new(399, 2), Decimal::new(1, 2)];
        let series = CumulativeSeries::build(&input).unwrap();
        assert_eq!(series.running.last().copied(), Some(series.total));
    }

    #[test]
    fn trend_points_keep_dates() {
        let d1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let daily = DailyTotals::new(vec![d1, d2], ds(&[10, 5])).unwrap();
        assert_eq!(
            trend_points(&daily).unwrap(),
            vec![(d1, Decimal::from(10)), (d2, Decimal::from(15))]
        );
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let huge = Decimal::from_scientific("5e28").unwrap();
        let err = CumulativeSeries::build(&[huge, huge]).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidArgument(_)));
        assert!(grand_total(&[huge, huge]).is_err());
        assert_eq!(running_totals(&[huge]).unwrap(), vec![huge]);
    }
}

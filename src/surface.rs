//! Collaborators the dashboard draws into.
//!
//! The controller never builds markup or talks to a chart library itself;
//! it hands finished values to these traits. Each chart is destroyed and
//! recreated on every refresh.

use std::time::Duration;

use chrono::NaiveDate;
use log::{error, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config;
use crate::models::{AlertLevel, Expense};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn background(self) -> &'static str {
        match self {
            Self::Success => "linear-gradient(to right, #00b09b, #96c93d)",
            Self::Error => "linear-gradient(to right, #ff5f6d, #ffc371)",
            Self::Warning => "linear-gradient(to right, #f2994a, #f2c94c)",
            Self::Info => "linear-gradient(to right, #667eea, #764ba2)",
        }
    }

    /// Every notice dismisses itself after the same delay.
    pub fn duration(self) -> Duration {
        config::NOTIFICATION_DURATION
    }
}

pub trait NotificationChannel {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Writes notices to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationChannel for LogNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Success | Severity::Info => info!("{}", message),
        }
    }
}

/// Text for the three headline cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCards {
    pub total_spent: String,
    pub net_balance: String,
    pub budget_limit: String,
}

pub trait PresentationSurface {
    fn show_greeting(&mut self, greeting: &str);

    fn show_access_token(&mut self, token: &str);

    fn render_rows(&mut self, rows: &[Expense]);

    /// Shown instead of rows when the user has no expenses yet.
    fn render_empty_state(&mut self);

    fn show_summary(&mut self, cards: &SummaryCards);

    fn show_gauge(&mut self, percent: Decimal, level: AlertLevel);

    fn set_alert_visible(&mut self, visible: bool);

    /// One flag per rendered row, in row order.
    fn set_row_visibility(&mut self, visible: &[bool]);

    fn show_cumulative_total(&mut self, total: &str);

    fn clear_expense_form(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Proportion,
    Comparison,
    Trend,
}

/// Share of spend per category.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionChart {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
    pub colors: Vec<&'static str>,
}

/// Actual spend bars colored by risk, against suggested budget points.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub labels: Vec<String>,
    pub actual: Vec<Decimal>,
    pub suggested: Vec<Decimal>,
    pub levels: Vec<AlertLevel>,
    pub colors: Vec<&'static str>,
    pub borders: Vec<String>,
}

/// Cumulative spend by day.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub dates: Vec<NaiveDate>,
    pub cumulative: Vec<Decimal>,
}

pub trait VisualizationSurface {
    fn destroy(&mut self, kind: ChartKind);

    fn draw_proportion(&mut self, chart: ProportionChart);

    fn draw_comparison(&mut self, chart: ComparisonChart);

    fn draw_trend(&mut self, chart: TrendChart);
}

/// Money label with two decimals, e.g. `$12.50`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

pub(crate) fn palette(n: usize) -> Vec<&'static str> {
    config::PROPORTION_PALETTE.iter().copied().cycle().take(n).collect()
}

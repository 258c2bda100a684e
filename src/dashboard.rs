//! The dashboard page controller.
//!
//! Wires the freshness gate, the remote client and the pure analysis
//! functions to the presentation collaborators. Remote failures never
//! escape this type: each one is caught where the call was made, logged,
//! and reported through the [`NotificationChannel`]. The user recovers by
//! repeating the action.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::analysis::{self, CumulativeSeries};
use crate::client::ExpenseClient;
use crate::config;
use crate::error::{DashboardError, Result};
use crate::gate::{Admission, Denial, FreshnessGate, Grant};
use crate::models::{Expense, NewExpense, Summary};
use crate::sequence::Streams;
use crate::session::{self, SessionStore};
use crate::surface::{
    self, ChartKind, ComparisonChart, NotificationChannel, PresentationSurface, ProportionChart,
    Severity, SummaryCards, TrendChart, VisualizationSurface,
};

/// Result of opening the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Ready(Grant),
    Redirect {
        target: &'static str,
        denial: Denial,
    },
}

pub struct Dashboard<P, V, N> {
    client: ExpenseClient,
    gate: FreshnessGate,
    store: Arc<dyn SessionStore>,
    presentation: P,
    visualization: V,
    notifier: N,
    rows: Vec<Expense>,
    category_filter: Option<String>,
    streams: Streams,
}

impl<P, V, N> Dashboard<P, V, N>
where
    P: PresentationSurface,
    V: VisualizationSurface,
    N: NotificationChannel,
{
    pub fn new(client: ExpenseClient, presentation: P, visualization: V, notifier: N) -> Self {
        let store = client.store().clone();
        Self {
            gate: FreshnessGate::new(store.clone()),
            client,
            store,
            presentation,
            visualization,
            notifier,
            rows: Vec::new(),
            category_filter: None,
            streams: Streams::default(),
        }
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn visualization(&self) -> &V {
        &self.visualization
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Rows currently rendered in the table.
    pub fn rows(&self) -> &[Expense] {
        &self.rows
    }

    // -- Page lifecycle ----------------------------------------------------

    /// Run the freshness gate and, if admitted, populate the page.
    pub fn open(&mut self) -> Result<PageOutcome> {
        let grant = match self.gate.evaluate()? {
            Admission::Denied(denial) => {
                return Ok(PageOutcome::Redirect {
                    target: denial.redirect(),
                    denial,
                })
            }
            Admission::Granted(grant) => grant,
        };

        info!("Page load admitted");
        if let Some(greeting) = grant.greeting() {
            self.presentation.show_greeting(&greeting);
        }
        self.presentation.show_access_token(&grant.token);
        self.load_expenses(None);
        Ok(PageOutcome::Ready(grant))
    }

    /// Sign out and return where to send the user.
    pub fn logout(&mut self) -> &'static str {
        if let Err(e) = session::end(self.store.as_ref()) {
            warn!("Failed to clear session: {}", e);
        }
        self.rows.clear();
        config::LOGIN_PAGE
    }

    // -- Loading -----------------------------------------------------------

    /// Fetch and render the expense table, then refresh summary and charts.
    ///
    /// `filter` is the raw comma-separated category box. It is remembered
    /// and reused by later reloads triggered from create/delete/update.
    pub fn load_expenses(&mut self, filter: Option<&str>) {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        self.category_filter = filter.map(str::to_string);
        let categories = filter.map(analysis::parse_category_filter).unwrap_or_default();

        let ticket = self.streams.expenses.issue();
        match self.client.list_expenses(&categories) {
            Ok(rows) => {
                if self.streams.expenses.accept(ticket) {
                    debug!("Rendering {} expenses", rows.len());
                    if rows.is_empty() {
                        self.presentation.render_empty_state();
                    } else {
                        self.presentation.render_rows(&rows);
                    }
                    self.rows = rows;
                    if let Some(f) = filter {
                        self.notifier
                            .notify(&format!("Showing expenses for: {f}"), Severity::Info);
                    }
                }
            }
            Err(e) => {
                warn!("Failed to load expenses: {}", e);
                self.notify_failure("Error loading data", &e);
            }
        }

        self.refresh_all();
    }

    fn reload(&mut self) {
        let filter = self.category_filter.clone();
        self.load_expenses(filter.as_deref());
    }

    /// Refresh summary and all three charts, reporting at most one failure.
    pub fn refresh_all(&mut self) {
        let results = [
            self.try_refresh_summary(),
            self.try_render_comparison_chart(),
            self.try_render_daily_chart(),
        ];
        if let Some(e) = results.into_iter().find_map(|r| r.err()) {
            self.notify_failure("Could not refresh the dashboard", &e);
        }
    }

    // -- Summary and charts ------------------------------------------------

    /// Headline cards, gauge, alert banner and the category proportion chart.
    pub fn refresh_summary(&mut self) {
        if let Err(e) = self.try_refresh_summary() {
            self.notify_failure("Could not load the summary", &e);
        }
    }

    pub fn render_category_chart(&mut self) {
        match self.fetch_summary() {
            Ok(Some(summary)) => self.draw_proportion(&summary),
            Ok(None) => {}
            Err(e) => self.notify_failure("Could not load the category chart", &e),
        }
    }

    pub fn render_comparison_chart(&mut self) {
        if let Err(e) = self.try_render_comparison_chart() {
            self.notify_failure("Could not load the budget comparison", &e);
        }
    }

    pub fn render_daily_chart(&mut self) {
        if let Err(e) = self.try_render_daily_chart() {
            self.notify_failure("Could not load daily spending", &e);
        }
    }

    /// `Ok(None)` means a newer summary was already rendered.
    fn fetch_summary(&mut self) -> Result<Option<Summary>> {
        let ticket = self.streams.summary.issue();
        let summary = self.client.summary()?;
        Ok(self.streams.summary.accept(ticket).then_some(summary))
    }

    fn try_refresh_summary(&mut self) -> Result<()> {
        let Some(summary) = self.fetch_summary()? else {
            return Ok(());
        };

        self.presentation.show_summary(&SummaryCards {
            total_spent: surface::format_money(summary.total_spent),
            net_balance: surface::format_money(summary.net_balance),
            budget_limit: surface::format_money(summary.budget_limit),
        });
        self.presentation
            .show_gauge(summary.gauge_percent(), summary.alert_level);
        self.presentation
            .set_alert_visible(summary.shows_alert_banner());
        self.draw_proportion(&summary);
        Ok(())
    }

    fn draw_proportion(&mut self, summary: &Summary) {
        if summary.by_category.is_empty() {
            return;
        }
        let labels: Vec<String> = summary.by_category.keys().cloned().collect();
        let values: Vec<Decimal> = summary.by_category.values().copied().collect();
        self.visualization.destroy(ChartKind::Proportion);
        self.visualization.draw_proportion(ProportionChart {
            colors: surface::palette(labels.len()),
            labels,
            values,
        });
    }

    fn try_render_comparison_chart(&mut self) -> Result<()> {
        let ticket = self.streams.comparison.issue();
        let comparison = self.client.budget_comparison()?;
        if !self.streams.comparison.accept(ticket) {
            return Ok(());
        }
        if comparison.is_empty() {
            debug!("No categories for the comparison chart");
            return Ok(());
        }

        let levels = analysis::classify_comparison(&comparison);
        self.visualization.destroy(ChartKind::Comparison);
        self.visualization.draw_comparison(ComparisonChart {
            labels: comparison.categories().to_vec(),
            actual: comparison.actual().to_vec(),
            suggested: comparison.suggested().to_vec(),
            colors: levels.iter().map(|l| l.color()).collect(),
            borders: levels.iter().map(|l| l.border_color()).collect(),
            levels,
        });
        Ok(())
    }

    fn try_render_daily_chart(&mut self) -> Result<()> {
        let ticket = self.streams.daily.issue();
        let daily = self.client.daily_totals()?;
        if !self.streams.daily.accept(ticket) {
            return Ok(());
        }

        let series = CumulativeSeries::from_daily(&daily)?;
        self.presentation
            .show_cumulative_total(&surface::format_money(series.total));
        if series.is_empty() {
            return Ok(());
        }

        self.visualization.destroy(ChartKind::Trend);
        self.visualization.draw_trend(TrendChart {
            dates: daily.dates().to_vec(),
            cumulative: series.running,
        });
        Ok(())
    }

    // -- Table filter ------------------------------------------------------

    /// Show only rows whose description or category contains `needle`.
    pub fn filter_table(&mut self, needle: &str) -> Vec<bool> {
        let visible = analysis::visibility(needle, &self.rows);
        self.presentation.set_row_visibility(&visible);
        visible
    }

    // -- Mutations ---------------------------------------------------------

    /// Create an expense from raw form input. Returns whether it was saved.
    pub fn create_expense_from_form(&mut self, description: &str, amount: &str, category: &str) -> bool {
        match NewExpense::from_form(description, amount, category) {
            Ok(expense) => self.create_expense(&expense),
            Err(e) => {
                self.notifier.notify(&local_message(&e), Severity::Warning);
                false
            }
        }
    }

    pub fn create_expense(&mut self, expense: &NewExpense) -> bool {
        if let Err(e) = expense.validate() {
            self.notifier.notify(&local_message(&e), Severity::Warning);
            return false;
        }
        match self.client.create_expense(expense) {
            Ok(_) => {
                self.notifier.notify("Expense saved", Severity::Success);
                self.presentation.clear_expense_form();
                self.reload();
                true
            }
            Err(e) => {
                self.notify_failure("Could not save the expense", &e);
                false
            }
        }
    }

    pub fn update_expense(&mut self, id: i64, expense: &NewExpense) -> bool {
        if let Err(e) = expense.validate() {
            self.notifier.notify(&local_message(&e), Severity::Warning);
            return false;
        }
        match self.client.update_expense(id, expense) {
            Ok(_) => {
                self.notifier.notify("Expense updated", Severity::Success);
                self.reload();
                true
            }
            Err(e) => {
                self.notify_failure("Could not update the expense", &e);
                false
            }
        }
    }

    /// Delete an expense. Asking the user to confirm is the caller's job.
    pub fn delete_expense(&mut self, id: i64) -> bool {
        match self.client.delete_expense(id) {
            Ok(_) => {
                self.notifier.notify("Expense deleted", Severity::Success);
                self.reload();
                true
            }
            Err(e) => {
                self.notify_failure("Could not delete the expense", &e);
                false
            }
        }
    }

    /// Set a new monthly budget from raw text. Blank input means the user
    /// cancelled and nothing happens.
    pub fn update_budget(&mut self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.is_empty() {
            return false;
        }
        let limit = match raw.parse::<Decimal>() {
            Ok(limit) if limit > Decimal::ZERO => limit,
            _ => {
                self.notifier
                    .notify(&format!("'{raw}' is not a valid budget"), Severity::Warning);
                return false;
            }
        };
        match self.client.update_budget(limit) {
            Ok(_) => {
                self.notifier.notify("Budget updated", Severity::Success);
                self.reload();
                true
            }
            Err(e) => {
                self.notify_failure("Could not update the budget", &e);
                false
            }
        }
    }

    // -- Exports -----------------------------------------------------------

    /// Download the CSV export into `dir`. Returns the written path.
    pub fn export_csv(&mut self, dir: &Path) -> Option<PathBuf> {
        let name = format!("gastos_{}.csv", Local::now().format("%Y-%m-%d"));
        let result = self
            .client
            .export_csv()
            .and_then(|bytes| write_download(dir, &name, &bytes));
        match result {
            Ok(path) => {
                self.notifier.notify("CSV file downloaded", Severity::Success);
                Some(path)
            }
            Err(e) => {
                self.notify_failure("Could not export the data", &e);
                None
            }
        }
    }

    /// Download the PDF report into `dir`. Returns the written path.
    pub fn export_pdf(&mut self, dir: &Path) -> Option<PathBuf> {
        let name = format!("reporte_finanzas_{}.pdf", Local::now().format("%Y-%m-%d"));
        let result = self
            .client
            .export_pdf()
            .and_then(|bytes| write_download(dir, &name, &bytes));
        match result {
            Ok(path) => {
                self.notifier.notify("PDF report downloaded", Severity::Success);
                Some(path)
            }
            Err(e) => {
                self.notify_failure("Could not generate the report", &e);
                None
            }
        }
    }

    // -- Identity ----------------------------------------------------------

    /// Hand back the short access code for the clipboard.
    pub fn copy_access_code(&mut self) -> Option<String> {
        let code = session::identity(self.store.as_ref())
            .ok()
            .flatten()
            .and_then(|id| id.access_code);
        match &code {
            Some(c) => self
                .notifier
                .notify(&format!("Code {c} copied"), Severity::Success),
            None => self
                .notifier
                .notify("No access code found", Severity::Warning),
        }
        code
    }

    fn notify_failure(&mut self, action: &str, error: &DashboardError) {
        let message = match error {
            DashboardError::Network(_) => "Could not connect to the server".to_string(),
            DashboardError::Unauthenticated | DashboardError::UnverifiedSession => {
                "Your session has ended; please sign in again".to_string()
            }
            other => match other.detail() {
                Some(detail) => format!("{action}: {detail}"),
                None => action.to_string(),
            },
        };
        self.notifier.notify(&message, Severity::Error);
    }
}

fn local_message(error: &DashboardError) -> String {
    match error {
        DashboardError::InvalidArgument(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn write_download(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, bytes)?;
    Ok(path)
}

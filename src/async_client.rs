//! Async wrapper around [`ExpenseClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every blocking call on the runtime's blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the event loop free. Calls made
//! through [`latest()`](AsyncExpenseClient::latest) are tagged with a
//! sequence ticket so that, when several fetches of the same view overlap,
//! only the newest response is handed back.
//!
//! # Example
//!
//! ```no_run
//! use expense_dashboard::{AsyncExpenseClient, ExpenseDashboard};
//! use expense_dashboard::sequence::RequestSequencer;
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = ExpenseDashboard::builder().build().unwrap();
//!     let client = app.async_client();
//!     let seq = RequestSequencer::new();
//!
//!     let rows = client
//!         .latest(&seq, |c| c.list_expenses(&["Food".to_string()]))
//!         .await
//!         .unwrap();
//! }
//! ```

use std::sync::Arc;

use crate::client::ExpenseClient;
use crate::error::{DashboardError, Result};
use crate::models::{BudgetComparison, DailyTotals, Expense, Summary};
use crate::sequence::RequestSequencer;

/// Async wrapper around [`ExpenseClient`].
///
/// The inner client is shared behind an [`Arc`]; it holds no mutable state
/// of its own, so concurrent calls need no lock.
#[derive(Clone)]
pub struct AsyncExpenseClient {
    inner: Arc<ExpenseClient>,
}

impl AsyncExpenseClient {
    pub fn new(client: ExpenseClient) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }

    /// Run a blocking client operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ExpenseClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.inner.clone();
        tokio::task::spawn_blocking(move || f(client.as_ref()))
            .await
            .map_err(|e| DashboardError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Like [`run()`](Self::run), but yields `None` if a request issued
    /// later on the same `sequencer` was already accepted.
    pub async fn latest<F, T>(&self, sequencer: &RequestSequencer, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&ExpenseClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ticket = sequencer.issue();
        let value = self.run(f).await?;
        Ok(sequencer.accept(ticket).then_some(value))
    }

    pub async fn list_expenses(&self, categories: Vec<String>) -> Result<Vec<Expense>> {
        self.run(move |c| c.list_expenses(&categories)).await
    }

    pub async fn summary(&self) -> Result<Summary> {
        self.run(|c| c.summary()).await
    }

    pub async fn budget_comparison(&self) -> Result<BudgetComparison> {
        self.run(|c| c.budget_comparison()).await
    }

    pub async fn daily_totals(&self) -> Result<DailyTotals> {
        self.run(|c| c.daily_totals()).await
    }
}

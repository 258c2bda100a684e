//! Client-side control logic for a personal expense dashboard.
//!
//! Provides the session freshness gate that admits or redirects a page
//! load, a blocking client for the remote expense service, and pure
//! functions that turn server snapshots into budget risk levels,
//! cumulative spending trends and table filter decisions.
//!
//! # Quick start
//!
//! ```no_run
//! use expense_dashboard::{ExpenseDashboard, LogNotifier};
//! use expense_dashboard::models::Credentials;
//!
//! let app = ExpenseDashboard::builder()
//!     .base_url("http://localhost:8000")
//!     .build()
//!     .unwrap();
//!
//! // Signing in arms the freshness flag for the next page load.
//! app.client()
//!     .login(&Credentials { email: "ana@example.com".into(), password: "secret".into() })
//!     .unwrap();
//!
//! let admission = app.gate().evaluate().unwrap();
//! assert!(admission.is_granted());
//! ```

pub mod analysis;
#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gate;
pub mod models;
pub mod sequence;
pub mod session;
pub mod surface;

#[cfg(feature = "async")]
pub use async_client::AsyncExpenseClient;
pub use client::ExpenseClient;
pub use dashboard::{Dashboard, PageOutcome};
pub use error::{DashboardError, Result};
pub use gate::{Admission, Denial, FreshnessGate, Grant};
pub use session::{FileSessionStore, Identity, MemorySessionStore, Namespace, SessionStore};
pub use surface::{LogNotifier, NotificationChannel, PresentationSurface, Severity, VisualizationSurface};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ExpenseDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`ExpenseDashboard`].
///
/// Use [`ExpenseDashboard::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ExpenseDashboardBuilder::build).
pub struct ExpenseDashboardBuilder {
    base_url: String,
    timeout: Duration,
    session_dir: Option<PathBuf>,
    store: Option<Arc<dyn SessionStore>>,
}

impl Default for ExpenseDashboardBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            session_dir: None,
            store: None,
        }
    }
}

impl ExpenseDashboardBuilder {
    /// Root URL of the expense service. Defaults to `http://localhost:8000`.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory for the on-disk session file.
    ///
    /// If not set, the platform data directory is used (e.g.
    /// `~/.local/share/expense-dashboard` on Linux). Ignored when a store is
    /// injected with [`store()`](Self::store).
    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use a specific session store instead of the on-disk default.
    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<ExpenseDashboard> {
        let store: Arc<dyn SessionStore> = match self.store {
            Some(store) => store,
            None => Arc::new(FileSessionStore::open(self.session_dir)?),
        };
        let client = ExpenseClient::new(&self.base_url, self.timeout, store.clone())?;
        Ok(ExpenseDashboard { client, store })
    }
}

// ---------------------------------------------------------------------------
// ExpenseDashboard
// ---------------------------------------------------------------------------

/// Entry point: owns the session store and the remote client.
///
/// Created via [`ExpenseDashboard::builder()`].
pub struct ExpenseDashboard {
    client: ExpenseClient,
    store: Arc<dyn SessionStore>,
}

impl ExpenseDashboard {
    pub fn builder() -> ExpenseDashboardBuilder {
        ExpenseDashboardBuilder::default()
    }

    pub fn client(&self) -> &ExpenseClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// A gate over this dashboard's session store.
    pub fn gate(&self) -> FreshnessGate {
        FreshnessGate::new(self.store.clone())
    }

    /// Soft re-entry: re-arm the freshness flag using the saved token.
    pub fn resume(&self) -> Result<()> {
        session::resume(self.store.as_ref())
    }

    /// Build a page controller drawing into the given collaborators.
    pub fn page<P, V, N>(&self, presentation: P, visualization: V, notifier: N) -> Dashboard<P, V, N>
    where
        P: PresentationSurface,
        V: VisualizationSurface,
        N: NotificationChannel,
    {
        Dashboard::new(self.client.clone(), presentation, visualization, notifier)
    }

    /// An async handle sharing this dashboard's client.
    #[cfg(feature = "async")]
    pub fn async_client(&self) -> AsyncExpenseClient {
        AsyncExpenseClient::new(self.client.clone())
    }
}

impl fmt::Display for ExpenseDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signed_in = matches!(session::token(self.store.as_ref()), Ok(Some(_)));
        write!(
            f,
            "ExpenseDashboard(base_url={}, signed_in={})",
            self.client.base_url(),
            signed_in
        )
    }
}

//! Blocking HTTP client for the remote expense service.
//!
//! Every authenticated call reads the bearer token from the session store at
//! the moment it is sent, so a login or logout elsewhere takes effect on the
//! next request. Non-success responses become [`DashboardError::Rejected`]
//! carrying the service's `detail` text when it sent one; transport failures
//! become [`DashboardError::Network`].

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::{
    Ack, AuthResponse, BudgetComparison, BudgetUpdate, Credentials, DailyTotals, Expense,
    NewExpense, Registration, Summary,
};
use crate::session::{self, SessionStore};

#[derive(Clone)]
pub struct ExpenseClient {
    base_url: String,
    http: Client,
    store: Arc<dyn SessionStore>,
}

impl ExpenseClient {
    pub fn new(base_url: &str, timeout: Duration, store: Arc<dyn SessionStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        self.http.request(method, url)
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = session::token(self.store.as_ref())?.ok_or(DashboardError::Unauthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    /// Send and turn a non-success status into `Rejected`.
    fn send(builder: RequestBuilder) -> Result<Response> {
        let resp = builder.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let detail = resp
            .bytes()
            .ok()
            .and_then(|body| serde_json::from_slice::<serde_json::Value>(&body).ok())
            .and_then(|body| {
                body.get("detail").map(|d| match d.as_str() {
                    Some(s) => s.to_string(),
                    None => d.to_string(),
                })
            });
        debug!("Request rejected with {} ({:?})", status, detail);
        Err(DashboardError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }

    fn decode<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let body = Self::send(builder)?.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Self::decode(self.authed(Method::GET, path)?)
    }

    fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        Self::decode(self.authed(method, path)?.json(body))
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let resp = Self::send(self.authed(Method::GET, path)?)?;
        Ok(resp.bytes()?.to_vec())
    }

    // -- Authentication ----------------------------------------------------

    /// Sign in and record the session, arming the freshness flag.
    pub fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let auth: AuthResponse =
            Self::decode(self.request(Method::POST, config::LOGIN_PATH).json(credentials))?;
        session::establish(self.store.as_ref(), &auth.token, &auth.identity)?;
        Ok(auth)
    }

    /// Create an account; the service signs the new user in immediately.
    pub fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        let auth: AuthResponse =
            Self::decode(self.request(Method::POST, config::REGISTER_PATH).json(registration))?;
        session::establish(self.store.as_ref(), &auth.token, &auth.identity)?;
        Ok(auth)
    }

    // -- Reads -------------------------------------------------------------

    /// List expenses, newest first. Each entry in `categories` is sent as a
    /// separate query parameter; an empty slice lists everything.
    pub fn list_expenses(&self, categories: &[String]) -> Result<Vec<Expense>> {
        let mut builder = self.authed(Method::GET, config::EXPENSES_PATH)?;
        if !categories.is_empty() {
            let query: Vec<(&str, &str)> = categories
                .iter()
                .map(|c| (config::CATEGORY_PARAM, c.as_str()))
                .collect();
            builder = builder.query(&query);
        }
        Self::decode(builder)
    }

    pub fn summary(&self) -> Result<Summary> {
        self.get_json(config::SUMMARY_PATH)
    }

    pub fn budget_comparison(&self) -> Result<BudgetComparison> {
        self.get_json(config::COMPARISON_PATH)
    }

    pub fn daily_totals(&self) -> Result<DailyTotals> {
        self.get_json(config::DAILY_PATH)
    }

    // -- Writes ------------------------------------------------------------

    pub fn create_expense(&self, expense: &NewExpense) -> Result<Ack> {
        expense.validate()?;
        self.send_json(Method::POST, config::EXPENSES_PATH, expense)
    }

    pub fn update_expense(&self, id: i64, expense: &NewExpense) -> Result<Ack> {
        expense.validate()?;
        self.send_json(Method::PUT, &format!("{}/{}", config::EXPENSES_PATH, id), expense)
    }

    pub fn delete_expense(&self, id: i64) -> Result<Ack> {
        Self::decode(self.authed(Method::DELETE, &format!("{}/{}", config::EXPENSES_PATH, id))?)
    }

    pub fn update_budget(&self, new_limit: Decimal) -> Result<Ack> {
        if new_limit <= Decimal::ZERO {
            return Err(DashboardError::InvalidArgument(
                "Budget limit must be greater than zero".into(),
            ));
        }
        self.send_json(Method::PUT, config::BUDGET_PATH, &BudgetUpdate { new_limit })
    }

    // -- Exports -----------------------------------------------------------

    pub fn export_csv(&self) -> Result<Vec<u8>> {
        self.get_bytes(config::EXPORT_CSV_PATH)
    }

    pub fn export_pdf(&self) -> Result<Vec<u8>> {
        self.get_bytes(config::EXPORT_PDF_PATH)
    }
}

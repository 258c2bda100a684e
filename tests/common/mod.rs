//! Shared fixtures for the dashboard integration tests.
//!
//! Provides a canned-response HTTP stub (`StubServer`) that records every
//! request it receives, recording fakes for the presentation collaborators,
//! and sample service payloads.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use expense_dashboard::models::{AlertLevel, Expense};
use expense_dashboard::session::{self, Identity};
use expense_dashboard::surface::{
    ChartKind, ComparisonChart, ProportionChart, SummaryCards, TrendChart,
};
use expense_dashboard::{
    ExpenseDashboard, MemorySessionStore, NotificationChannel, PresentationSurface, Severity,
    SessionStore, VisualizationSurface,
};
use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// StubServer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including any query string.
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or("")
    }

    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, q)| q)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string().into_bytes(),
        }
    }

    pub fn bytes(content_type: &'static str, body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.to_vec(),
        }
    }
}

type Handler = Arc<dyn Fn(&RecordedRequest) -> StubResponse + Send + Sync>;

/// A tiny HTTP/1.1 server answering from a handler, one thread per connection.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Handler = Arc::new(handler);

        let log = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let (handler, log) = (handler.clone(), log.clone());
                thread::spawn(move || serve(stream, &handler, &log));
            }
        });

        Self { base_url, requests }
    }

    /// Serve fixed responses keyed by `"METHOD /path"`; anything else is a 404.
    pub fn routes(routes: Vec<(&'static str, StubResponse)>) -> Self {
        let table: HashMap<&'static str, StubResponse> = routes.into_iter().collect();
        Self::start(move |req| {
            let key = format!("{} {}", req.method, req.path());
            table
                .get(key.as_str())
                .cloned()
                .unwrap_or_else(|| StubResponse::json(404, serde_json::json!({"detail": "Not Found"})))
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path() == path)
            .collect()
    }
}

/// Requests are logged before the response is written, so a caller that
/// has its response can always see its request.
fn serve(
    stream: TcpStream,
    handler: &Handler,
    log: &Mutex<Vec<RecordedRequest>>,
) -> Option<()> {
    stream.set_read_timeout(Some(Duration::from_secs(5))).ok()?;
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).ok()?;

    let req = RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let resp = handler(&req);
    log.lock().unwrap().push(req);
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        resp.status,
        if resp.status < 400 { "OK" } else { "Error" },
        resp.content_type,
        resp.body.len()
    );
    let stream = reader.get_mut();
    stream.write_all(head.as_bytes()).ok()?;
    stream.write_all(&resp.body).ok()?;
    stream.flush().ok()?;
    Some(())
}

/// A base URL nothing is listening on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Sample payloads
// ---------------------------------------------------------------------------

pub fn expenses_json() -> serde_json::Value {
    serde_json::json!([
        {"id": 3, "monto": 12.5, "categoria": "Dining", "fecha": "2024-05-03", "descripcion": "Fast Food"},
        {"id": 2, "monto": 8.0, "categoria": "Food", "fecha": "2024-05-02", "descripcion": "Lunch"},
        {"id": 1, "monto": 40.0, "categoria": "Transport", "fecha": "2024-05-01", "descripcion": "Gas"}
    ])
}

pub fn summary_json(level: &str) -> serde_json::Value {
    serde_json::json!({
        "total_general": 60.5,
        "por_categoria": {"Dining": 12.5, "Food": 8.0, "Transport": 40.0},
        "presupuesto_limite": 100.0,
        "saldo_disponible": 39.5,
        "porcentaje_usado": 60.5,
        "nivel_alerta": level,
        "balance_neto": 39.5
    })
}

pub fn comparison_json() -> serde_json::Value {
    serde_json::json!({
        "categorias": ["Dining", "Food", "Transport"],
        "gastos_reales": [90, 50, 40],
        "presupuesto_sugerido": [100, 100, 0]
    })
}

pub fn daily_json() -> serde_json::Value {
    serde_json::json!({
        "fechas": ["2024-05-01", "2024-05-02", "2024-05-03"],
        "totales": [10, 0, 5]
    })
}

/// Routes for a fully populated dashboard.
pub fn dashboard_routes(extra: Vec<(&'static str, StubResponse)>) -> StubServer {
    let mut routes = vec![
        ("GET /gastos", StubResponse::json(200, expenses_json())),
        ("GET /gastos/resumen", StubResponse::json(200, summary_json("seguro"))),
        ("GET /gastos/comparacion-presupuesto", StubResponse::json(200, comparison_json())),
        ("GET /gastos/diarios", StubResponse::json(200, daily_json())),
    ];
    routes.extend(extra);
    StubServer::routes(routes)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub fn ana() -> Identity {
    Identity {
        id: 7,
        name: "Ana María López".into(),
        email: Some("ana@example.com".into()),
        access_code: Some("482913".into()),
    }
}

/// A memory store holding a token and identity, with the flag armed.
pub fn signed_in_store() -> Arc<MemorySessionStore> {
    let store = Arc::new(MemorySessionStore::new());
    session::establish(store.as_ref(), "tok-123", &ana()).unwrap();
    store
}

/// Route `log` output through the test harness; set `RUST_LOG` to see it.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn app(base_url: &str, store: Arc<dyn SessionStore>) -> ExpenseDashboard {
    init_logging();
    ExpenseDashboard::builder()
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .store(store)
        .build()
        .unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

// ---------------------------------------------------------------------------
// Recording collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub greeting: Option<String>,
    pub token: Option<String>,
    pub rows: Vec<Expense>,
    pub empty_state_shown: bool,
    pub cards: Option<SummaryCards>,
    pub gauge: Option<(Decimal, AlertLevel)>,
    pub alert_visible: Option<bool>,
    pub visibility: Vec<bool>,
    pub cumulative_total: Option<String>,
    pub forms_cleared: usize,
}

impl PresentationSurface for RecordingPresentation {
    fn show_greeting(&mut self, greeting: &str) {
        self.greeting = Some(greeting.to_string());
    }

    fn show_access_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    fn render_rows(&mut self, rows: &[Expense]) {
        self.empty_state_shown = false;
        self.rows = rows.to_vec();
    }

    fn render_empty_state(&mut self) {
        self.rows.clear();
        self.empty_state_shown = true;
    }

    fn show_summary(&mut self, cards: &SummaryCards) {
        self.cards = Some(cards.clone());
    }

    fn show_gauge(&mut self, percent: Decimal, level: AlertLevel) {
        self.gauge = Some((percent, level));
    }

    fn set_alert_visible(&mut self, visible: bool) {
        self.alert_visible = Some(visible);
    }

    fn set_row_visibility(&mut self, visible: &[bool]) {
        self.visibility = visible.to_vec();
    }

    fn show_cumulative_total(&mut self, total: &str) {
        self.cumulative_total = Some(total.to_string());
    }

    fn clear_expense_form(&mut self) {
        self.forms_cleared += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingCharts {
    pub destroyed: Vec<ChartKind>,
    pub proportion: Option<ProportionChart>,
    pub comparison: Option<ComparisonChart>,
    pub trend: Option<TrendChart>,
}

impl VisualizationSurface for RecordingCharts {
    fn destroy(&mut self, kind: ChartKind) {
        self.destroyed.push(kind);
    }

    fn draw_proportion(&mut self, chart: ProportionChart) {
        self.proportion = Some(chart);
    }

    fn draw_comparison(&mut self, chart: ComparisonChart) {
        self.comparison = Some(chart);
    }

    fn draw_trend(&mut self, chart: TrendChart) {
        self.trend = Some(chart);
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub notices: Vec<(String, Severity)>,
}

impl RecordingNotifier {
    pub fn last(&self) -> Option<&(String, Severity)> {
        self.notices.last()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices.iter().filter(|(_, s)| *s == severity).count()
    }
}

impl NotificationChannel for RecordingNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.notices.push((message.to_string(), severity));
    }
}

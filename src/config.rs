use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where a denied page load is sent.
pub const LOGIN_PAGE: &str = "/static/login.html";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long a notification stays on screen before it dismisses itself.
pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);

// Remote service paths
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/registro";
pub const EXPENSES_PATH: &str = "/gastos";
pub const SUMMARY_PATH: &str = "/gastos/resumen";
pub const COMPARISON_PATH: &str = "/gastos/comparacion-presupuesto";
pub const DAILY_PATH: &str = "/gastos/diarios";
pub const BUDGET_PATH: &str = "/usuario/presupuesto";
pub const EXPORT_CSV_PATH: &str = "/gastos/exportar/csv";
pub const EXPORT_PDF_PATH: &str = "/gastos/reporte/pdf";

/// Query parameter repeated once per category when filtering the expense list.
pub const CATEGORY_PARAM: &str = "categorias";

// Traffic-light palette for the comparison chart.
pub const DANGER_COLOR: &str = "rgba(244, 67, 54, 0.8)";
pub const WARNING_COLOR: &str = "rgba(255, 152, 0, 0.8)";
pub const NORMAL_COLOR: &str = "rgba(76, 175, 80, 0.8)";

pub const PROPORTION_PALETTE: [&str; 5] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#F7B731", "#9B59B6"];

pub const SESSION_FILE: &str = "session.json";

pub fn default_session_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("expense-dashboard")
    } else {
        PathBuf::from(".expense-dashboard")
    }
}

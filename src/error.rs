#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("No session token; sign in required")]
    Unauthenticated,

    #[error("Session token present but this page load was not verified")]
    UnverifiedSession,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request rejected with status {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DashboardError {
    /// Failures that leave the page running and are only reported to the user.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Rejected { .. })
    }

    /// Server-provided detail, if the service sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

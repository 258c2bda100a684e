use serde::{Deserialize, Serialize};

use crate::session::Identity;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body returned by both login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "mensaje", default)]
    pub message: String,
    pub token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    #[serde(rename = "usuario")]
    pub identity: Identity,
}

fn bearer() -> String {
    "bearer".to_string()
}

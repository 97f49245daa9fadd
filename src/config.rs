use std::path::PathBuf;

use crate::accounts::password::PasswordScheme;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Where the user map is persisted; in-memory when unset.
    pub data_dir: Option<PathBuf>,
    pub password_scheme: PasswordScheme,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        let data_dir = std::env::var("DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let password_scheme = match std::env::var("PASSWORD_SCHEME") {
            Ok(v) => v.parse()?,
            Err(_) => PasswordScheme::Plaintext,
        };
        Ok(Self {
            host,
            port,
            data_dir,
            password_scheme,
        })
    }
}

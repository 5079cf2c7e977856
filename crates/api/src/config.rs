use std::path::PathBuf;
use std::time::Duration;

/// Development fallback for `SECRET_KEY`.
pub const DEV_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    ///
    /// Should stay above `script_timeout_secs` so a slow script is reported
    /// as a timed-out run rather than a 408.
    pub request_timeout_secs: u64,
    /// Per-run subprocess timeout in seconds (default: `30`).
    pub script_timeout_secs: u64,
    /// Directory holding the allow-listed script files (default: `scripts`).
    pub scripts_dir: PathBuf,
    /// Session-signing secret. Nothing signs sessions yet.
    pub secret_key: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                |
    /// |------------------------|----------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                              |
    /// | `PORT`                 | `5000`                                 |
    /// | `CORS_ORIGINS`         | `http://localhost:5000`                |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                                   |
    /// | `SCRIPT_TIMEOUT_SECS`  | `30`                                   |
    /// | `SCRIPTS_DIR`          | `scripts`                              |
    /// | `SECRET_KEY`           | `dev-secret-key-change-in-production`  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5000".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let script_timeout_secs: u64 = std::env::var("SCRIPT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SCRIPT_TIMEOUT_SECS must be a valid u64");

        let scripts_dir = std::env::var("SCRIPTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("scripts"));

        let secret_key = std::env::var("SECRET_KEY").unwrap_or_else(|_| DEV_SECRET_KEY.into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            script_timeout_secs,
            scripts_dir,
            secret_key,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_trims_and_skips_blanks() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn timeouts_convert_to_durations() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 60,
            script_timeout_secs: 30,
            scripts_dir: PathBuf::from("scripts"),
            secret_key: DEV_SECRET_KEY.into(),
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.script_timeout(), Duration::from_secs(30));
    }
}

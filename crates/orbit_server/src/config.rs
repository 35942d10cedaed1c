//! Server configuration from command-line flags and environment.

use crate::ai::gemini::DEFAULT_BASE_URL;
use clap::Parser;
use orbit_core::{default_log_level, LogSettings};
use std::path::PathBuf;

/// Runtime settings; every flag can also come from its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "orbit", version, about = "Orbit student planner API server")]
pub struct ServerConfig {
    /// Interface to bind.
    #[arg(long, env = "ORBIT_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// TCP port to bind.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// SQLite database file; created with its parent directory when missing.
    #[arg(long, env = "ORBIT_DB_PATH", default_value = "orbit.sqlite3")]
    pub database: PathBuf,

    /// HMAC secret used to sign bearer tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Bearer token lifetime in days.
    #[arg(long, env = "ORBIT_TOKEN_TTL_DAYS", default_value_t = 30)]
    pub token_ttl_days: u32,

    /// Google AI Studio key; AI endpoints answer 503 without it.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Base URL of the Generative Language REST API.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "ORBIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files; stderr only when unset.
    #[arg(long, env = "ORBIT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Mirror file logs to stderr.
    #[arg(long)]
    pub log_stderr: bool,
}

impl ServerConfig {
    /// Rejects settings clap cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.trim().is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }
        if self.token_ttl_days == 0 {
            return Err("token TTL must be at least one day".to_string());
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.token_ttl_days))
    }

    /// Gemini key with blank values treated as absent.
    pub fn gemini_key(&self) -> Option<String> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: self.log_dir.clone(),
            echo_stderr: self.log_stderr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;
    use clap::Parser;

    #[test]
    fn flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "orbit",
            "--jwt-secret",
            "s3cret",
            "--port",
            "8080",
            "--database",
            "/tmp/orbit-test.sqlite3",
            "--token-ttl-days",
            "7",
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.token_ttl(), chrono::Duration::days(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_secret_and_zero_ttl_are_rejected() {
        let mut config =
            ServerConfig::try_parse_from(["orbit", "--jwt-secret", "  "]).unwrap();
        assert!(config.validate().is_err());

        config.jwt_secret = "s3cret".to_string();
        config.token_ttl_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_gemini_key_counts_as_missing() {
        let config = ServerConfig::try_parse_from([
            "orbit",
            "--jwt-secret",
            "s3cret",
            "--gemini-api-key",
            " ",
        ])
        .unwrap();
        assert_eq!(config.gemini_key(), None);
    }
}

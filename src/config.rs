//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Host configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the HTTP host listens on.
    pub port: u16,
    /// Base URL of the authentication service.
    pub auth_base_url: String,
    /// Backend endpoint for final submissions. Falls back to files when unset.
    pub save_url: Option<String>,
    /// Directory for file-backed submissions.
    pub submissions_dir: PathBuf,
    /// Where the signed-in session is persisted between restarts.
    pub session_file: PathBuf,
    /// Optional directory for rolling log files.
    pub log_dir: Option<PathBuf>,
    /// Wizards untouched this long are discarded.
    pub wizard_idle_timeout: Duration,
}

impl ServerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth_base_url = lookup("KYC_AUTH_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("KYC_AUTH_BASE_URL".to_string()))?;

        let port = match lookup("KYC_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "KYC_PORT".to_string(),
                message: format!("{raw:?} is not a valid port"),
            })?,
            None => 8080,
        };

        let save_url = lookup("KYC_SAVE_URL").filter(|s| !s.trim().is_empty());

        let submissions_dir = lookup("KYC_SUBMISSIONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/submissions"));

        let session_file = lookup("KYC_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data/session.json"));

        let log_dir = lookup("KYC_LOG_DIR").map(PathBuf::from);

        let wizard_idle_timeout = match lookup("KYC_WIZARD_IDLE_MINUTES") {
            Some(raw) => {
                let minutes: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "KYC_WIZARD_IDLE_MINUTES".to_string(),
                    message: format!("{raw:?} is not a number of minutes"),
                })?;
                Duration::from_secs(minutes * 60)
            }
            None => Duration::from_secs(3600), // 1 hour
        };

        Ok(Self {
            port,
            auth_base_url: auth_base_url.trim_end_matches('/').to_string(),
            save_url,
            submissions_dir,
            session_file,
            log_dir,
            wizard_idle_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_auth_url_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "KYC_AUTH_BASE_URL"));
    }

    #[test]
    fn defaults_apply() {
        let config =
            ServerConfig::from_lookup(lookup(&[("KYC_AUTH_BASE_URL", "http://auth.local/")]))
                .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.auth_base_url, "http://auth.local");
        assert!(config.save_url.is_none());
        assert_eq!(config.submissions_dir, PathBuf::from("./data/submissions"));
        assert_eq!(config.session_file, PathBuf::from("./data/session.json"));
        assert!(config.log_dir.is_none());
        assert_eq!(config.wizard_idle_timeout, Duration::from_secs(3600));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("KYC_AUTH_BASE_URL", "http://auth.local"),
            ("KYC_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "KYC_PORT"));
    }

    #[test]
    fn overrides_are_read() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("KYC_AUTH_BASE_URL", "http://auth.local"),
            ("KYC_PORT", "9000"),
            ("KYC_SAVE_URL", "http://backend.local/submissions"),
            ("KYC_LOG_DIR", "/tmp/kyc-logs"),
            ("KYC_WIZARD_IDLE_MINUTES", "15"),
        ]))
        .unwrap();
        assert_eq!(config.wizard_idle_timeout, Duration::from_secs(900));
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.save_url.as_deref(),
            Some("http://backend.local/submissions")
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/kyc-logs")));
    }
}

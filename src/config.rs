use anyhow::Context;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5002";
pub const BASE_URL_ENV: &str = "ROSTERD_BASE_URL";
pub const SESSION_COOKIE_ENV: &str = "ROSTERD_SESSION_COOKIE";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base url is empty")]
    EmptyBaseUrl,
    #[error("base url must start with http:// or https://, got {0}")]
    UnsupportedScheme(String),
}

/// Where the portal lives and which session the sidecar speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Raw `Cookie` header value, e.g. `session=...`.
    pub session_cookie: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Result<Self, ConfigError> {
        let base = base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let lower = base.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(base.to_string()));
        }
        let session_cookie = session_cookie
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string());
        Ok(Self {
            base_url: base.to_string(),
            session_cookie,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let base = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let cookie = std::env::var(SESSION_COOKIE_ENV).ok();
        Self::new(&base, cookie.as_deref()).with_context(|| format!("invalid {}", BASE_URL_ENV))
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let cfg = ClientConfig::new("http://portal.local:5002//", None).unwrap();
        assert_eq!(cfg.base_url, "http://portal.local:5002");
        assert_eq!(
            cfg.url_for("/faculty/api/enrolled-students"),
            "http://portal.local:5002/faculty/api/enrolled-students"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert_eq!(ClientConfig::new("  ", None), Err(ConfigError::EmptyBaseUrl));
        assert!(matches!(
            ClientConfig::new("ftp://portal", None),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn blank_cookie_means_no_session() {
        let cfg = ClientConfig::new("https://portal", Some("   ")).unwrap();
        assert_eq!(cfg.session_cookie, None);
        let cfg = ClientConfig::new("https://portal", Some("session=abc")).unwrap();
        assert_eq!(cfg.session_cookie.as_deref(), Some("session=abc"));
    }
}

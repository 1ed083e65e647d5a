use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

/// Where the hosted backend lives and how to reach it.
///
/// `url` is the project base URL; the data API hangs off `/rest/v1` and the
/// auth API off `/auth/v1`. `anon_key` is the project's publishable API key,
/// sent as the `apikey` header on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub goals_relation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub debug_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Backend overrides
        if let Ok(v) = env::var("GOALTRACK_BACKEND_URL") {
            self.backend.url = v;
        }
        if let Ok(v) = env::var("GOALTRACK_ANON_KEY") {
            self.backend.anon_key = v;
        }
        if let Ok(v) = env::var("GOALTRACK_GOALS_RELATION") {
            self.backend.goals_relation = v;
        }

        // HTTP overrides
        if let Ok(v) = env::var("GOALTRACK_REQUEST_TIMEOUT_SECS") {
            self.http.request_timeout_secs = v.parse().unwrap_or(self.http.request_timeout_secs);
        }
        if let Ok(v) = env::var("GOALTRACK_CONNECT_TIMEOUT_SECS") {
            self.http.connect_timeout_secs = v.parse().unwrap_or(self.http.connect_timeout_secs);
        }
        if let Ok(v) = env::var("GOALTRACK_HTTP_DEBUG_LOGGING") {
            self.http.debug_logging = v.parse().unwrap_or(self.http.debug_logging);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                // Local supabase stack default
                url: "http://127.0.0.1:54321".to_string(),
                anon_key: String::new(),
                goals_relation: "goals".to_string(),
            },
            http: HttpConfig {
                request_timeout_secs: 30,
                connect_timeout_secs: 10,
                debug_logging: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                // No usable default in production; must come from env
                url: String::new(),
                anon_key: String::new(),
                goals_relation: "goals".to_string(),
            },
            http: HttpConfig {
                request_timeout_secs: 10,
                connect_timeout_secs: 5,
                debug_logging: false,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.backend.url, "http://127.0.0.1:54321");
        assert_eq!(config.backend.goals_relation, "goals");
        assert!(config.http.debug_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.backend.url.is_empty());
        assert_eq!(config.http.request_timeout_secs, 10);
        assert!(!config.http.debug_logging);
    }
}

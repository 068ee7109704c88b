use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
    /// Request header carrying the identity token.
    pub token_header: String,
    pub token_issuer: String,
    pub token_expiry_hours: u64,
    pub remember_me_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("USERSERVICE_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("USERSERVICE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_PRIVATE_KEY_PATH") {
            self.security.private_key_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SECURITY_PUBLIC_KEY_PATH") {
            self.security.public_key_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_HEADER") {
            self.security.token_header = v.trim().to_string();
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_ISSUER") {
            self.security.token_issuer = v;
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_EXPIRY_HOURS") {
            self.security.token_expiry_hours = v.parse().unwrap_or(self.security.token_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_REMEMBER_ME_EXPIRY_HOURS") {
            self.security.remember_me_expiry_hours =
                v.parse().unwrap_or(self.security.remember_me_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                private_key_path: PathBuf::from("keys/private.pem"),
                public_key_path: PathBuf::from("keys/public.pem"),
                token_header: "Authorization".to_string(),
                token_issuer: "budget-userservice".to_string(),
                token_expiry_hours: 24 * 7, // 1 week
                remember_me_expiry_hours: 24 * 30,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                private_key_path: PathBuf::from("/etc/budget/keys/private.pem"),
                public_key_path: PathBuf::from("/etc/budget/keys/public.pem"),
                token_header: "Authorization".to_string(),
                token_issuer: "budget-userservice".to_string(),
                token_expiry_hours: 24,
                remember_me_expiry_hours: 24 * 14,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                private_key_path: PathBuf::from("/etc/budget/keys/private.pem"),
                public_key_path: PathBuf::from("/etc/budget/keys/public.pem"),
                token_header: "Authorization".to_string(),
                token_issuer: "budget-userservice".to_string(),
                token_expiry_hours: 4,
                remember_me_expiry_hours: 24 * 7,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.is_development());
        assert_eq!(config.security.token_header, "Authorization");
        assert_eq!(config.security.token_expiry_hours, 24 * 7);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.is_development());
        assert_eq!(config.security.token_expiry_hours, 4);
        assert!(config.security.remember_me_expiry_hours > config.security.token_expiry_hours);
        assert_eq!(config.api.max_request_size_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_remember_me_outlives_standard_token_in_every_preset() {
        for config in [AppConfig::development(), AppConfig::staging(), AppConfig::production()] {
            assert!(
                config.security.remember_me_expiry_hours > config.security.token_expiry_hours,
                "{:?}",
                config.environment
            );
        }
    }
}

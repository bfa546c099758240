use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// Errors raised while assembling configuration. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub datastore: DatastoreConfig,
    pub auth: AuthConfig,
    pub gate: GateConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Secret value that never shows up in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    /// Base URL of the managed datastore; REST and identity endpoints hang off it.
    pub url: Url,
    /// Restricted read credential, subject to row-level security.
    pub public_key: Credential,
    /// Privileged credential, used only by the admin routes.
    pub service_key: Credential,
    pub table: String,
    pub timeout_secs: u64,
}

impl DatastoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Raw comma-separated administrator email list (ADMIN_EMAILS).
    pub admin_emails: String,
    pub session_cookie: String,
    /// When present, session tokens are verified with HS256 instead of only decoded.
    pub jwt_secret: Option<Credential>,
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub login_path: String,
    pub home_path: String,
    pub api_prefix: String,
    pub asset_prefixes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub secure_cookies: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let datastore = DatastoreConfig::from_lookup(&lookup)?;

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(datastore),
            Environment::Staging => Self::staging(datastore),
            Environment::Development => Self::development(datastore),
        };

        let config = config.with_overrides(&lookup);
        config.gate.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Auth overrides
        if let Some(v) = lookup("ADMIN_EMAILS") {
            self.auth.admin_emails = v;
        }
        if let Some(v) = non_empty(lookup("SESSION_COOKIE_NAME")) {
            self.auth.session_cookie = v;
        }
        if let Some(v) = non_empty(lookup("SESSION_JWT_SECRET")) {
            self.auth.jwt_secret = Some(Credential::new(v));
        }

        // Gate overrides
        if let Some(v) = non_empty(lookup("LOGIN_PATH")) {
            self.gate.login_path = v;
        }
        if let Some(v) = lookup("GATE_ASSET_PREFIXES") {
            self.gate.asset_prefixes = split_list(&v);
        }

        // API overrides
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Some(v) = non_empty(lookup("STATIC_DIR")) {
            self.api.static_dir = PathBuf::from(v);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Some(v) = lookup("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }

        self
    }

    fn development(datastore: DatastoreConfig) -> Self {
        Self {
            environment: Environment::Development,
            datastore,
            auth: AuthConfig::default(),
            gate: GateConfig::default(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
                static_dir: PathBuf::from("public"),
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                secure_cookies: false,
            },
        }
    }

    fn staging(datastore: DatastoreConfig) -> Self {
        Self {
            environment: Environment::Staging,
            datastore,
            auth: AuthConfig::default(),
            gate: GateConfig::default(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 256 * 1024,
                static_dir: PathBuf::from("public"),
            },
            security: SecurityConfig {
                cors_origins: Vec::new(),
                secure_cookies: true,
            },
        }
    }

    fn production(datastore: DatastoreConfig) -> Self {
        Self {
            environment: Environment::Production,
            datastore,
            auth: AuthConfig::default(),
            gate: GateConfig::default(),
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 64 * 1024,
                static_dir: PathBuf::from("public"),
            },
            security: SecurityConfig {
                cors_origins: Vec::new(),
                secure_cookies: true,
            },
        }
    }
}

impl DatastoreConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = required(lookup, "DATASTORE_URL")?;
        let url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            name: "DATASTORE_URL",
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid {
                name: "DATASTORE_URL",
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let timeout_secs = match lookup("DATASTORE_TIMEOUT_SECS") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                name: "DATASTORE_TIMEOUT_SECS",
                reason: format!("'{}' is not a number of seconds", v),
            })?,
            None => 10,
        };

        Ok(Self {
            url,
            public_key: Credential::new(required(lookup, "DATASTORE_PUBLIC_KEY")?),
            service_key: Credential::new(required(lookup, "DATASTORE_SERVICE_KEY")?),
            table: non_empty(lookup("TECHNICIANS_TABLE")).unwrap_or_else(|| "techniciens".to_string()),
            timeout_secs,
        })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_emails: String::new(),
            session_cookie: "sb-access-token".to_string(),
            jwt_secret: None,
        }
    }
}

/// Page paths served by fixed routes; the login page cannot take one of them.
const RESERVED_PAGE_PATHS: &[&str] = &["/", "/admin", "/favicon.ico", "/assets"];

impl GateConfig {
    /// The login path must be a plain page route the gate actually governs.
    fn validate(&self) -> Result<(), ConfigError> {
        let path = self.login_path.as_str();
        let invalid = |reason: String| ConfigError::Invalid { name: "LOGIN_PATH", reason };

        if !path.starts_with('/') {
            return Err(invalid(format!("'{}' must start with '/'", path)));
        }
        if RESERVED_PAGE_PATHS.contains(&path) {
            return Err(invalid(format!("'{}' is already served by another page", path)));
        }
        if path.contains(':') || path.contains('*') {
            return Err(invalid(format!("'{}' must not contain route parameters", path)));
        }
        let bypassed = std::iter::once(&self.api_prefix)
            .chain(self.asset_prefixes.iter())
            .any(|prefix| path.starts_with(prefix.as_str()));
        if bypassed {
            return Err(invalid(format!("'{}' falls under an API or asset prefix", path)));
        }
        Ok(())
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            api_prefix: "/api/".to_string(),
            asset_prefixes: vec!["/assets/".to_string(), "/favicon.ico".to_string()],
        }
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(name)).ok_or(ConfigError::Missing(name))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

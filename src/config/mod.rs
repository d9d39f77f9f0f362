use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Service configuration, built once in `main` and shared through `AppState`
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub http: HttpConfig,
    pub jwt: JwtConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub public_host: String,
    pub public_scheme: String,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithms: Vec<Algorithm>,
    pub audience: String,
    pub issuer: String,
    pub expires_in_secs: u64,
}

/// Longest accepted token lifetime (10 years)
pub const MAX_EXPIRES_IN_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` takes precedence
    pub level: String,
    /// Include source file and line in log lines
    pub src: bool,
    /// Additional plain-text log files, each with its own level
    pub files: Vec<LogFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFile {
    pub path: PathBuf,
    pub level: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***REDACTED***")
            .field("algorithms", &self.algorithms)
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

impl HttpConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
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
        // HTTP overrides
        if let Ok(v) = env::var("HTTP_HOST") {
            self.http.host = v;
        }
        if let Some(port) = env::var("HTTP_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|v| v.parse().ok())
        {
            self.http.port = port;
        }
        if let Ok(v) = env::var("HTTP_PUBLIC_HOST") {
            self.http.public_host = v;
        }
        if let Ok(v) = env::var("HTTP_PUBLIC_SCHEME") {
            self.http.public_scheme = v;
        }

        // JWT overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ALGORITHMS") {
            let parsed = parse_algorithms(&v);
            if !parsed.is_empty() {
                self.jwt.algorithms = parsed;
            }
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.jwt.audience = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.jwt.issuer = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRES_IN") {
            match parse_expires_in(&v) {
                Some(secs) => self.jwt.expires_in_secs = secs,
                None => tracing::warn!(
                    "Ignoring JWT_EXPIRES_IN '{}', expected 1..={} seconds",
                    v,
                    MAX_EXPIRES_IN_SECS
                ),
            }
        }

        // Logging overrides
        if let Ok(v) = env::var("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = env::var("LOG_SRC") {
            self.logging.src = v.parse().unwrap_or(self.logging.src);
        }
        if let Ok(v) = env::var("LOG_FILES") {
            self.logging.files = parse_log_files(&v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            http: HttpConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_host: "localhost:3000".to_string(),
                public_scheme: "http".to_string(),
            },
            jwt: JwtConfig {
                secret: "slotlist-development-secret".to_string(),
                algorithms: vec![Algorithm::HS256],
                audience: "slotlist-backend".to_string(),
                issuer: "slotlist-backend".to_string(),
                expires_in_secs: 7 * 24 * 60 * 60, // 1 week
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                src: true,
                files: Vec::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            http: HttpConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_host: "api.staging.slotlist.info".to_string(),
                public_scheme: "https".to_string(),
            },
            jwt: JwtConfig {
                secret: String::new(),
                algorithms: vec![Algorithm::HS256],
                audience: "slotlist-backend".to_string(),
                issuer: "slotlist-backend".to_string(),
                expires_in_secs: 24 * 60 * 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                src: false,
                files: Vec::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            http: HttpConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                public_host: "api.slotlist.info".to_string(),
                public_scheme: "https".to_string(),
            },
            jwt: JwtConfig {
                // must come from JWT_SECRET
                secret: String::new(),
                algorithms: vec![Algorithm::HS256],
                audience: "slotlist-backend".to_string(),
                issuer: "slotlist-backend".to_string(),
                expires_in_secs: 7 * 24 * 60 * 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                src: false,
                files: Vec::new(),
            },
        }
    }
}

/// Token lifetime in seconds, `None` unless within `1..=MAX_EXPIRES_IN_SECS`
pub fn parse_expires_in(raw: &str) -> Option<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| (1..=MAX_EXPIRES_IN_SECS).contains(secs))
}

/// Parse `path=level` pairs separated by commas (`logs/api.log=info,logs/debug.log=debug`).
/// A path without `=level` logs at `info`.
pub fn parse_log_files(raw: &str) -> Vec<LogFile> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (path, level) = match entry.rsplit_once('=') {
                Some((path, level)) => (path.trim(), level.trim()),
                None => (entry, "info"),
            };
            if path.is_empty() {
                tracing::warn!("Ignoring log file entry without a path: '{}'", entry);
                return None;
            }
            Some(LogFile {
                path: PathBuf::from(path),
                level: if level.is_empty() { "info" } else { level }.to_string(),
            })
        })
        .collect()
}

/// Parse a comma separated algorithm list (`HS256,HS512`), dropping unknown names
pub fn parse_algorithms(raw: &str) -> Vec<Algorithm> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| match Algorithm::from_str(name) {
            Ok(alg) => Some(alg),
            Err(_) => {
                tracing::warn!("Ignoring unknown JWT algorithm '{}'", name);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.http.port, 3000);
        assert_eq!(config.jwt.algorithms, vec![Algorithm::HS256]);
        assert!(!config.jwt.secret.is_empty());
        assert_eq!(config.http.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.jwt.secret.is_empty());
        assert_eq!(config.http.public_scheme, "https");
    }

    #[test]
    fn parses_algorithm_list() {
        assert_eq!(
            parse_algorithms("HS256, HS512"),
            vec![Algorithm::HS256, Algorithm::HS512]
        );
        assert_eq!(parse_algorithms("HS256,nope,"), vec![Algorithm::HS256]);
        assert!(parse_algorithms("").is_empty());
    }

    #[test]
    fn debug_output_hides_jwt_secret() {
        let config = AppConfig::development();
        let printed = format!("{:?}", config.jwt);
        assert!(!printed.contains("slotlist-development-secret"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn parses_log_file_list() {
        assert_eq!(
            parse_log_files("logs/api.log=info, logs/debug.log = debug,plain.log,=warn,"),
            vec![
                LogFile {
                    path: PathBuf::from("logs/api.log"),
                    level: "info".to_string(),
                },
                LogFile {
                    path: PathBuf::from("logs/debug.log"),
                    level: "debug".to_string(),
                },
                LogFile {
                    path: PathBuf::from("plain.log"),
                    level: "info".to_string(),
                },
            ]
        );
        assert!(parse_log_files("").is_empty());
    }

    #[test]
    fn token_lifetime_is_bounded() {
        assert_eq!(parse_expires_in("3600"), Some(3600));
        assert_eq!(parse_expires_in(&MAX_EXPIRES_IN_SECS.to_string()), Some(MAX_EXPIRES_IN_SECS));
        assert_eq!(parse_expires_in(&(MAX_EXPIRES_IN_SECS + 1).to_string()), None);
        assert_eq!(parse_expires_in(&u64::MAX.to_string()), None);
        assert_eq!(parse_expires_in("0"), None);
        assert_eq!(parse_expires_in("-5"), None);
    }
}

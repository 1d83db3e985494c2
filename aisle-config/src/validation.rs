use axum::http::{Method, header::HeaderName};
use thiserror::Error;
use url::Url;

use crate::models::{Config, CorsConfig, PagingConfig};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
    #[error("invalid paging configuration: {reason}")]
    InvalidPaging { reason: String },
    #[error("PUBLIC_URL `{value}` is not an absolute http(s) URL")]
    InvalidPublicUrl { value: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    validate_paging(&config.paging)?;

    if !config.dev_mode && config.cors.is_wildcard_included() {
        return Err(ConfigGuardRailError::DangerousCorsWildcard);
    }

    validate_cors(&config.cors)?;

    if let Some(public_url) = &config.server.public_url {
        validate_public_url(public_url)?;
    }

    if config.database.url.is_none() {
        warnings.push_with_hint(
            "DATABASE_URL not configured; the server can only run with --in-memory",
            "Set DATABASE_URL, DATABASE_URL_FILE or database.url in aisle.toml",
        );
    }

    if config.database.max_connections == 0 {
        warnings.push(
            "DATABASE_MAX_CONNECTIONS is 0; the pool will be created with a single connection",
        );
    }

    Ok(warnings)
}

fn validate_paging(paging: &PagingConfig) -> Result<(), ConfigGuardRailError> {
    if paging.max_page_size == 0 {
        return Err(ConfigGuardRailError::InvalidPaging {
            reason: "PAGING_MAX_PAGE_SIZE must be at least 1".into(),
        });
    }

    if paging.default_page_size == 0
        || paging.default_page_size > paging.max_page_size
    {
        return Err(ConfigGuardRailError::InvalidPaging {
            reason: format!(
                "PAGING_DEFAULT_PAGE_SIZE must be within 1..={}, got {}",
                paging.max_page_size, paging.default_page_size
            ),
        });
    }

    Ok(())
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    if cors.allowed_methods.is_empty() {
        return Err(ConfigGuardRailError::InvalidCorsConfig {
            reason:
                "CORS_ALLOWED_METHODS must include at least one HTTP method"
                    .into(),
        });
    }

    for method in &cors.allowed_methods {
        Method::from_bytes(method.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid HTTP method `{}` in CORS_ALLOWED_METHODS",
                    method
                ),
            }
        })?;
    }

    for header in &cors.allowed_headers {
        HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!(
                    "invalid header name `{}` in CORS_ALLOWED_HEADERS",
                    header
                ),
            }
        })?;
    }

    Ok(())
}

fn validate_public_url(value: &str) -> Result<(), ConfigGuardRailError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigGuardRailError::InvalidPublicUrl {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ConfigMetadata, DatabaseConfig, ServerConfig,
    };

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
                public_url: None,
            },
            database: DatabaseConfig {
                url: Some("postgres://aisle@localhost/aisle".into()),
                max_connections: 10,
            },
            paging: PagingConfig::default(),
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:5173".into()],
                allowed_methods: vec!["GET".into(), "POST".into()],
                allowed_headers: vec!["Content-Type".into()],
            },
            dev_mode: false,
            metadata: ConfigMetadata::default(),
        }
    }

    #[test]
    fn clean_config_has_no_warnings() {
        let warnings = apply_guard_rails(&config()).expect("valid config");
        assert!(warnings.is_empty());
    }

    #[test]
    fn wildcard_origin_rejected_outside_dev_mode() {
        let mut cfg = config();
        cfg.cors.allowed_origins = vec!["*".into()];
        assert!(matches!(
            apply_guard_rails(&cfg),
            Err(ConfigGuardRailError::DangerousCorsWildcard)
        ));

        cfg.dev_mode = true;
        assert!(apply_guard_rails(&cfg).is_ok());
    }

    #[test]
    fn default_page_size_must_fit_under_max() {
        let mut cfg = config();
        cfg.paging = PagingConfig {
            default_page_size: 25,
            max_page_size: 20,
        };
        assert!(matches!(
            apply_guard_rails(&cfg),
            Err(ConfigGuardRailError::InvalidPaging { .. })
        ));

        cfg.paging = PagingConfig {
            default_page_size: 0,
            max_page_size: 20,
        };
        assert!(apply_guard_rails(&cfg).is_err());
    }

    #[test]
    fn zero_max_page_size_rejected() {
        let mut cfg = config();
        cfg.paging = PagingConfig {
            default_page_size: 0,
            max_page_size: 0,
        };
        let err = apply_guard_rails(&cfg).unwrap_err();
        assert!(err.to_string().contains("PAGING_MAX_PAGE_SIZE"));
    }

    #[test]
    fn missing_database_url_is_a_warning() {
        let mut cfg = config();
        cfg.database.url = None;
        let warnings = apply_guard_rails(&cfg).expect("still valid");
        assert_eq!(warnings.items.len(), 1);
        assert!(warnings.items[0].hint.is_some());
    }

    #[test]
    fn bad_cors_method_rejected() {
        let mut cfg = config();
        cfg.cors.allowed_methods = vec!["GE T".into()];
        assert!(matches!(
            apply_guard_rails(&cfg),
            Err(ConfigGuardRailError::InvalidCorsConfig { .. })
        ));
    }

    #[test]
    fn public_url_must_be_absolute_http() {
        let mut cfg = config();
        cfg.server.public_url = Some("/api".into());
        assert!(matches!(
            apply_guard_rails(&cfg),
            Err(ConfigGuardRailError::InvalidPublicUrl { .. })
        ));

        cfg.server.public_url = Some("https://catalog.example.com".into());
        assert!(apply_guard_rails(&cfg).is_ok());
    }
}

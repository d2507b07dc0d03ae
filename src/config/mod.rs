//! Configuration loading and management
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//!   base_url: https://library.example.com
//!   enable_cors: true
//! paging:
//!   default_page_size: 10
//!   max_page_size: 20
//! media:
//!   namespace: example
//! mappings:
//!   - source: AuthorDto
//!     destination: Author
//!     properties:
//!       - name: Surname
//!         targets: [LastName]
//! ```

use crate::core::error::ConfigError;
use crate::core::mapping::{MappingConfig, PropertyMappingRegistry};
use crate::entities::{Author, AuthorDto, author_property_mapping};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,

    /// Base URL used in generated links; derived from `bind` when absent
    pub base_url: Option<String>,

    /// Allow cross-origin requests and expose `Location` and `X-Pagination`
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            base_url: None,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            field: "server.bind".to_string(),
            value: self.bind.clone(),
            message: e.to_string(),
        })
    }

    /// Base URL for links
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.bind))
    }
}

/// Collection paging limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 20,
        }
    }
}

/// Vendor media type settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Vendor namespace, as in `application/vnd.<namespace>.author.full+json`
    pub namespace: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            namespace: "example".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paging: PagingConfig,
    pub media: MediaConfig,

    /// Additional or overriding property mapping tables
    pub mappings: Vec<MappingConfig>,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paging.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "paging.max_page_size".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        if self.paging.default_page_size == 0
            || self.paging.default_page_size > self.paging.max_page_size
        {
            return Err(ConfigError::InvalidValue {
                field: "paging.default_page_size".to_string(),
                value: self.paging.default_page_size.to_string(),
                message: format!("must be between 1 and {}", self.paging.max_page_size),
            });
        }

        if self.media.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "media.namespace".to_string(),
                value: self.media.namespace.clone(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Built-in author mapping, then the configured tables in order
    ///
    /// A configured table for an already registered pair replaces it.
    pub fn mapping_registry(&self) -> Result<PropertyMappingRegistry, ConfigError> {
        PropertyMappingRegistry::new()
            .register::<AuthorDto, Author>(author_property_mapping()?)
            .register_configs(&self.mappings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.server.base_url(), "http://127.0.0.1:3000");
        assert_eq!(config.paging.default_page_size, 10);
        assert_eq!(config.paging.max_page_size, 20);
        assert_eq!(config.media.namespace, "example");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            r#"
server:
  base_url: https://library.example.com
paging:
  max_page_size: 50
"#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.server.base_url(), "https://library.example.com");
        assert_eq!(config.paging.default_page_size, 10);
        assert_eq!(config.paging.max_page_size, 50);
    }

    #[test]
    fn test_invalid_paging_is_rejected() {
        let err = AppConfig::from_yaml_str("paging:\n  default_page_size: 30\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "paging.default_page_size"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = AppConfig::from_yaml_str("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { file: None, .. }));
    }

    #[test]
    fn test_bind_addr() {
        assert!(ServerConfig::default().bind_addr().is_ok());
        let bad = ServerConfig {
            bind: "nowhere".to_string(),
            base_url: None,
            enable_cors: true,
        };
        assert!(bad.bind_addr().is_err());
    }

    #[test]
    fn test_configured_mapping_is_merged() {
        let config = AppConfig::from_yaml_str(
            r#"
mappings:
  - source: CourseDto
    destination: Course
    properties:
      - name: Title
        targets: [Title]
"#,
        )
        .unwrap();

        let registry = config.mapping_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.lookup::<AuthorDto, Author>().unwrap().get("age").is_some());
        assert!(registry.lookup_named("CourseDto", "Course").is_ok());
    }
}

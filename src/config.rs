//! Startup configuration loaded from YAML.
//!
//! ```yaml
//! server:
//!   addr: "127.0.0.1:8080"
//! views:
//!   dir: views
//!   prefix: ""
//!   suffix: ".html"
//! errors:
//!   json_prefixes: ["/api"]
//!   view: error
//! ```
//!
//! Every section and key is optional; missing values take the defaults
//! shown above.

use crate::dispatcher::{DEFAULT_ERROR_VIEW, DEFAULT_JSON_ERROR_PREFIX};
use crate::view::TemplateRenderer;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub views: ViewsConfig,
    pub errors: ErrorsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
        }
    }
}

/// View resolution: `dir / (prefix + view + suffix)`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewsConfig {
    pub dir: PathBuf,
    pub prefix: String,
    pub suffix: String,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("views"),
            prefix: String::new(),
            suffix: ".html".to_string(),
        }
    }
}

impl ViewsConfig {
    #[must_use]
    pub fn renderer(&self) -> TemplateRenderer {
        TemplateRenderer::new(&self.dir)
            .with_prefix(&self.prefix)
            .with_suffix(&self.suffix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorsConfig {
    /// Request paths starting with one of these get JSON error bodies
    pub json_prefixes: Vec<String>,
    /// View rendered for HTML error pages
    pub view: String,
}

impl Default for ErrorsConfig {
    fn default() -> Self {
        Self {
            json_prefixes: vec![DEFAULT_JSON_ERROR_PREFIX.to_string()],
            view: DEFAULT_ERROR_VIEW.to_string(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self> {
        // An empty document deserializes to `null`
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).context("invalid configuration")
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&source).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let cfg = AppConfig::from_yaml("views:\n  dir: templates\n").unwrap();
        assert_eq!(cfg.views.dir, PathBuf::from("templates"));
        assert_eq!(cfg.views.suffix, ".html");
        assert_eq!(cfg.server.addr, "127.0.0.1:8080");
        assert_eq!(cfg.errors.json_prefixes, vec!["/api".to_string()]);
    }

    #[test]
    fn test_full_document() {
        let yaml = r#"
server:
  addr: "0.0.0.0:9000"
views:
  dir: /srv/views
  prefix: "pages/"
  suffix: ".jinja"
errors:
  json_prefixes: ["/api", "/rest"]
  view: oops
"#;
        let cfg = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.server.addr, "0.0.0.0:9000");
        assert_eq!(cfg.views.prefix, "pages/");
        assert_eq!(cfg.views.suffix, ".jinja");
        assert_eq!(cfg.errors.json_prefixes.len(), 2);
        assert_eq!(cfg.errors.view, "oops");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(AppConfig::from_yaml("server:\n  port: 1\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "server:\n  addr: \"127.0.0.1:0\"\n").unwrap();
        assert_eq!(AppConfig::load(&path).unwrap().server.addr, "127.0.0.1:0");
        assert!(AppConfig::load(&dir.path().join("missing.yaml")).is_err());
    }
}

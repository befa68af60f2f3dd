use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub content: Content,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// Directory of admin-authored `.kdl` visibility rules files.
    pub rules_dir: PathBuf,
    /// JSON export of the site's custom profile fields.
    pub field_registry: PathBuf,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from("rules"),
            field_registry: PathBuf::from("data/user_fields.json"),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("server.host", Server::default().host)
            .into_diagnostic()?
            .set_default("server.port", Server::default().port)
            .into_diagnostic()?
            .set_default(
                "content.rules_dir",
                Content::default().rules_dir.to_string_lossy().to_string(),
            )
            .into_diagnostic()?
            .set_default(
                "content.field_registry",
                Content::default()
                    .field_registry
                    .to_string_lossy()
                    .to_string(),
            )
            .into_diagnostic()?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: UMBRIEL__SERVER__PORT=9090, etc.
        builder = builder.add_source(config::Environment::with_prefix("UMBRIEL").separator("__"));

        let cfg = builder.build().into_diagnostic()?;
        let mut s: Settings = cfg.try_deserialize().into_diagnostic()?;

        // Normalize content paths to be relative to current dir
        if s.content.rules_dir.is_relative() {
            s.content.rules_dir = std::env::current_dir()
                .into_diagnostic()?
                .join(&s.content.rules_dir);
        }
        if s.content.field_registry.is_relative() {
            s.content.field_registry = std::env::current_dir()
                .into_diagnostic()?
                .join(&s.content.field_registry);
        }

        Ok(s)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

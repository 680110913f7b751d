//! Site configuration (folio.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Name of the site configuration file inside the base directory
pub const CONFIG_FILE: &str = "folio.yml";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub output_dir: String,

    // Loading
    pub extensions: Vec<String>,
    pub render_drafts: bool,
    pub parallel: bool,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub render: RenderConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            url: "http://example.com".to_string(),

            content_dir: "content/posts".to_string(),
            output_dir: "public".to_string(),

            extensions: vec!["md".to_string(), "markdown".to_string()],
            render_drafts: false,
            parallel: true,

            highlight: HighlightConfig::default(),
            render: RenderConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Markdown rendering limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Deepest block/inline nesting rendered as markdown before falling
    /// back to plain text
    pub max_nesting: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { max_nesting: 64 }
    }
}

//! folio: a small markdown article pipeline
//!
//! Reads a directory of markdown articles with YAML front-matter, renders
//! their bodies to sanitized HTML and builds a newest-first index that can be
//! looked up by slug.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod index;
pub mod pipeline;

use anyhow::Result;
use std::path::Path;

pub use content::Article;
pub use error::{ContentError, RenderDegradation};
pub use index::ArticleIndex;
pub use pipeline::BuildReport;

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content (article) directory
    pub content_dir: std::path::PathBuf,
    /// Output directory
    pub output_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(config::CONFIG_FILE);

        let config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Folio instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let output_dir = base_dir.join(&config.output_dir);

        Self {
            config,
            base_dir,
            content_dir,
            output_dir,
        }
    }

    /// Load, render and index every article
    pub fn load(&self) -> Result<BuildReport, ContentError> {
        pipeline::run(&self.config, &self.content_dir)
    }

    /// Build the site output
    pub fn build(&self) -> Result<BuildReport> {
        commands::build::run(self)
    }

    /// Clean the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new article
    pub fn new_article(&self, title: &str, excerpt: Option<&str>) -> Result<std::path::PathBuf> {
        commands::new::create_article(self, title, excerpt)
    }
}

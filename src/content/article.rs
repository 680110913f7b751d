//! Article model

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::FrontMatter;
use crate::error::ContentError;

lazy_static! {
    static ref VALID_SLUG: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// One published unit of content
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    /// URL-safe identifier derived from the file name
    pub slug: String,

    pub title: String,

    pub excerpt: String,

    /// Publication date, the primary sort key
    pub published_at: DateTime<Utc>,

    /// Last updated date
    pub updated_at: Option<DateTime<Utc>>,

    pub tags: Vec<String>,

    /// Raw markdown body
    pub body: String,

    /// Sanitized HTML rendering of the body
    pub html: String,

    /// Whether the body fell back to plain text rendering
    pub degraded: bool,

    /// Source file the article was built from
    pub source: PathBuf,

    /// Custom front-matter fields
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Article {
    /// Assemble an article from its parsed parts
    pub fn new(slug: String, fm: FrontMatter, body: &str, html: String, source: &Path) -> Self {
        Self {
            slug,
            title: fm.title,
            excerpt: fm.excerpt,
            published_at: fm.date,
            updated_at: fm.updated,
            tags: fm.tags,
            body: body.to_string(),
            html,
            degraded: false,
            source: source.to_path_buf(),
            extra: fm.extra,
        }
    }

    /// Listing entry without the body
    pub fn summary(&self) -> ArticleSummary<'_> {
        ArticleSummary {
            slug: &self.slug,
            title: &self.title,
            excerpt: &self.excerpt,
            published_at: self.published_at,
            updated_at: self.updated_at,
            tags: &self.tags,
        }
    }
}

/// Serializable listing entry for an article
#[derive(Debug, Clone, Serialize)]
pub struct ArticleSummary<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub excerpt: &'a str,
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: &'a [String],
}

/// Derive an article slug from its file name
pub fn slug_from_path(path: &Path) -> Result<String, ContentError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let slug = slug::slugify(stem);
    if is_valid_slug(&slug) {
        Ok(slug)
    } else {
        Err(ContentError::InvalidSlug {
            path: path.to_path_buf(),
        })
    }
}

/// Lowercase kebab-case, ASCII only
pub fn is_valid_slug(slug: &str) -> bool {
    VALID_SLUG.is_match(slug)
}

//! Create a new article

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Folio;

const DEFAULT_EXCERPT: &str = "Add a one-line summary here.";

/// Scaffold a new article file in the content directory
pub fn create_article(folio: &Folio, title: &str, excerpt: Option<&str>) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    fs::create_dir_all(&folio.content_dir)?;

    let ext = folio
        .config
        .extensions
        .first()
        .map(String::as_str)
        .unwrap_or("md");
    let file_path = folio.content_dir.join(format!("{}.{}", slug, ext));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now();
    let fm = FrontMatter::new(title, now, excerpt.unwrap_or(DEFAULT_EXCERPT));
    fs::write(&file_path, fm.to_document("")?)?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

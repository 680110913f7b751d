//! Generator module - writes the article index and rendered bodies to disk

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::ArticleSummary;
use crate::index::ArticleIndex;
use crate::Folio;

/// Directory under the output dir holding one HTML fragment per article
pub const ARTICLES_DIR: &str = "articles";

/// Writes build output for an index
pub struct Generator {
    output_dir: PathBuf,
    site_title: String,
    site_url: String,
}

/// Shape of `index.json`
#[derive(Serialize)]
struct IndexFile<'a> {
    title: &'a str,
    url: &'a str,
    generated_at: String,
    articles: Vec<IndexEntry<'a>>,
}

#[derive(Serialize)]
struct IndexEntry<'a> {
    #[serde(flatten)]
    summary: ArticleSummary<'a>,
    path: String,
    permalink: String,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Self {
        Self {
            output_dir: folio.output_dir.clone(),
            site_title: folio.config.title.clone(),
            site_url: folio.config.url.clone(),
        }
    }

    /// Write `index.json` and every article fragment.
    ///
    /// Fragments from the previous build are removed first, so articles that
    /// dropped out of the index do not linger in the output.
    pub fn generate(&self, index: &ArticleIndex) -> Result<()> {
        let articles_dir = self.output_dir.join(ARTICLES_DIR);
        if articles_dir.exists() {
            fs::remove_dir_all(&articles_dir)?;
            tracing::debug!("Deleted: {:?}", articles_dir);
        }
        fs::create_dir_all(&articles_dir)?;

        self.generate_index(index)?;
        self.generate_articles(index)?;

        Ok(())
    }

    /// Generate the listing (JSON)
    fn generate_index(&self, index: &ArticleIndex) -> Result<()> {
        let articles = index
            .iter()
            .map(|a| {
                let path = article_path(&a.slug);
                IndexEntry {
                    summary: a.summary(),
                    permalink: format!("{}/{}", self.site_url.trim_end_matches('/'), path),
                    path,
                }
            })
            .collect();

        let file = IndexFile {
            title: &self.site_title,
            url: &self.site_url,
            generated_at: chrono::Utc::now().to_rfc3339(),
            articles,
        };

        let output_path = self.output_dir.join("index.json");
        fs::write(&output_path, serde_json::to_string_pretty(&file)?)?;
        tracing::info!("Generated index.json ({} articles)", index.len());

        Ok(())
    }

    /// Generate one HTML fragment per article
    fn generate_articles(&self, index: &ArticleIndex) -> Result<()> {
        for article in index.iter() {
            let output_path = self.output_dir.join(article_path(&article.slug));
            fs::write(&output_path, &article.html)?;
            tracing::debug!("Generated {:?}", output_path);
        }
        Ok(())
    }
}

/// Output path of an article relative to the output dir
pub fn article_path(slug: &str) -> String {
    format!("{}/{}.html", ARTICLES_DIR, slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_generate() {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("first.md"),
            "---\ntitle: First\ndate: 2024-01-01\nexcerpt: One\n---\n# One\n",
        )
        .unwrap();
        fs::write(
            posts.join("second.md"),
            "---\ntitle: Second\ndate: 2024-02-01\nexcerpt: Two\ntags: [react]\n---\nTwo\n",
        )
        .unwrap();

        let config = SiteConfig {
            url: "https://blog.example.com/".to_string(),
            ..SiteConfig::default()
        };
        let folio = Folio::with_config(tmp.path(), config);
        let report = folio.load().unwrap();
        Generator::new(&folio).generate(&report.index).unwrap();

        let json: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(folio.output_dir.join("index.json")).unwrap(),
        )
        .unwrap();
        let articles = json["articles"].as_array().unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0]["slug"], "second");
        assert_eq!(articles[0]["tags"][0], "react");
        assert_eq!(
            articles[0]["permalink"],
            "https://blog.example.com/articles/second.html"
        );
        assert_eq!(articles[1]["slug"], "first");

        let html = fs::read_to_string(folio.output_dir.join("articles/first.html")).unwrap();
        assert_eq!(html, "<h1>One</h1>\n");
    }
}

//! Article index - the sorted, slug-addressable collection

use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::content::Article;
use crate::error::ContentError;

/// Articles ordered newest first, addressable by slug
#[derive(Debug, Clone, Default)]
pub struct ArticleIndex {
    articles: IndexMap<String, Article>,
}

impl ArticleIndex {
    /// Build the index from parsed articles.
    ///
    /// When two articles share a slug the one with the lexicographically
    /// smaller source path is kept; the others come back as
    /// [`ContentError::DuplicateSlug`].
    pub fn build(mut articles: Vec<Article>) -> (Self, Vec<ContentError>) {
        articles.sort_by(|a, b| a.slug.cmp(&b.slug).then_with(|| a.source.cmp(&b.source)));

        let mut unique: Vec<Article> = Vec::with_capacity(articles.len());
        let mut rejected = Vec::new();

        for article in articles {
            match unique.last() {
                Some(kept) if kept.slug == article.slug => {
                    rejected.push(ContentError::DuplicateSlug {
                        slug: article.slug.clone(),
                        path: article.source.clone(),
                        existing: kept.source.clone(),
                    });
                }
                _ => unique.push(article),
            }
        }

        unique.sort_by(listing_order);

        let articles = unique
            .into_iter()
            .map(|a| (a.slug.clone(), a))
            .collect();

        (Self { articles }, rejected)
    }

    /// Look up an article by slug
    pub fn get(&self, slug: &str) -> Result<&Article, ContentError> {
        self.articles
            .get(slug)
            .ok_or_else(|| ContentError::NotFound(format!("article '{}'", slug)))
    }

    /// Articles in listing order
    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.articles.values()
    }

    /// Article at a listing position
    pub fn get_index(&self, position: usize) -> Option<&Article> {
        self.articles.get_index(position).map(|(_, a)| a)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Slugs in listing order
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.articles.keys().map(String::as_str)
    }

    /// The article listed before `slug` (newer), if any
    pub fn newer(&self, slug: &str) -> Option<&Article> {
        let pos = self.articles.get_index_of(slug)?;
        pos.checked_sub(1).and_then(|p| self.get_index(p))
    }

    /// The article listed after `slug` (older), if any
    pub fn older(&self, slug: &str) -> Option<&Article> {
        let pos = self.articles.get_index_of(slug)?;
        self.get_index(pos + 1)
    }

    /// Tag usage counts, most used first, then by name
    pub fn tags(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for article in self.iter() {
            for tag in &article.tags {
                *counts.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut tags: Vec<_> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        tags
    }
}

/// Newest first; equal dates fall back to slug ascending
fn listing_order(a: &Article, b: &Article) -> Ordering {
    b.published_at
        .cmp(&a.published_at)
        .then_with(|| a.slug.cmp(&b.slug))
}

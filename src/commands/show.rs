//! Show a single article

use anyhow::Result;

use crate::Folio;

/// Print one article's metadata and rendered HTML
pub fn run(folio: &Folio, slug: &str) -> Result<()> {
    let report = folio.load()?;
    let index = &report.index;
    let article = index.get(slug)?;

    println!("Title:     {}", article.title);
    println!("Slug:      {}", article.slug);
    println!("Published: {}", article.published_at.to_rfc3339());
    if let Some(updated) = article.updated_at {
        println!("Updated:   {}", updated.to_rfc3339());
    }
    if !article.tags.is_empty() {
        println!("Tags:      {}", article.tags.join(", "));
    }
    println!("Source:    {}", article.source.display());
    println!("Excerpt:   {}", article.excerpt);
    if let Some(newer) = index.newer(slug) {
        println!("Newer:     {}", newer.slug);
    }
    if let Some(older) = index.older(slug) {
        println!("Older:     {}", older.slug);
    }
    if article.degraded {
        println!("(rendered as plain text)");
    }
    println!();
    println!("{}", article.html);

    Ok(())
}

//! List site content

use anyhow::Result;

use crate::Folio;

/// List articles in index order, or tag counts
pub fn run(folio: &Folio, tags: bool) -> Result<()> {
    let report = folio.load()?;
    let index = &report.index;

    if tags {
        let tags = index.tags();
        println!("Tags ({}):", tags.len());
        for (tag, count) in tags {
            println!("  {} ({})", tag, count);
        }
        return Ok(());
    }

    println!("Articles ({}):", index.len());
    for article in index.iter() {
        println!(
            "  {} - {} [{}]",
            article.published_at.format("%Y-%m-%d"),
            article.title,
            article.slug
        );
    }

    if !report.failures.is_empty() {
        println!(
            "Skipped {} invalid article(s), run `folio check` for details",
            report.failures.len()
        );
    }

    Ok(())
}

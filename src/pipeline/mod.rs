//! Build pipeline - load, parse, render and index a content directory
//!
//! Each file is processed independently. Failures stay with the file they
//! came from; only a missing content directory stops the run.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::SiteConfig;
use crate::content::{
    slug_from_path, Article, ContentLoader, FrontMatter, MarkdownRenderer, RawFile,
};
use crate::error::{ContentError, RenderDegradation};
use crate::index::ArticleIndex;

/// Outcome of one pipeline run
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Successfully built articles
    pub index: ArticleIndex,
    /// Files that were excluded, sorted by path
    pub failures: Vec<ContentError>,
    /// Articles rendered as plain text, sorted by path
    pub warnings: Vec<RenderDegradation>,
    /// Draft files skipped
    pub drafts: Vec<PathBuf>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Per-file result
enum Processed {
    Article(Box<Article>, Option<RenderDegradation>),
    Draft(PathBuf),
}

/// Run the whole pipeline over `dir`
pub fn run(config: &SiteConfig, dir: &Path) -> Result<BuildReport, ContentError> {
    let start = Instant::now();

    let loader = ContentLoader::new(dir, config);
    let files: Vec<Result<RawFile, ContentError>> = loader.files()?.collect();

    let renderer = MarkdownRenderer::from_config(config);
    let process = |file: Result<RawFile, ContentError>| {
        file.and_then(|raw| process_file(&raw, &renderer, config.render_drafts))
    };

    let results: Vec<Result<Processed, ContentError>> = if config.parallel {
        files.into_par_iter().map(process).collect()
    } else {
        files.into_iter().map(process).collect()
    };

    let mut report = BuildReport::default();
    let mut articles = Vec::new();

    for result in results {
        match result {
            Ok(Processed::Article(article, degradation)) => {
                articles.push(*article);
                report.warnings.extend(degradation);
            }
            Ok(Processed::Draft(path)) => report.drafts.push(path),
            Err(e) => report.failures.push(e),
        }
    }

    let (index, duplicates) = ArticleIndex::build(articles);
    report.index = index;
    report.failures.extend(duplicates);

    report.failures.sort_by(|a, b| a.path().cmp(&b.path()));
    report.warnings.sort_by(|a, b| a.path.cmp(&b.path));

    for failure in &report.failures {
        tracing::warn!("Excluded: {}", failure);
    }
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    for draft in &report.drafts {
        tracing::debug!("Skipped draft {:?}", draft);
    }

    tracing::info!(
        "Built {} articles from {:?} ({} failed, {} drafts) in {:.2}s",
        report.index.len(),
        dir,
        report.failures.len(),
        report.drafts.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Parse and render a single file
fn process_file(
    raw: &RawFile,
    renderer: &MarkdownRenderer,
    render_drafts: bool,
) -> Result<Processed, ContentError> {
    let (fm, body) = FrontMatter::parse(&raw.content)
        .map_err(|e| ContentError::malformed(&raw.path, e.to_string()))?;

    if !fm.published && !render_drafts {
        return Ok(Processed::Draft(raw.path.clone()));
    }

    let slug = slug_from_path(&raw.path)?;
    let rendered = renderer.render(body);

    let degradation = rendered.degradation.map(|reason| RenderDegradation {
        path: raw.path.clone(),
        reason,
    });

    let mut article = Article::new(slug, fm, body, rendered.html, &raw.path);
    article.degraded = degradation.is_some();

    Ok(Processed::Article(Box::new(article), degradation))
}

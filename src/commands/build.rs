//! Build the article index and write it to the output directory

use anyhow::Result;

use crate::generator::Generator;
use crate::pipeline::BuildReport;
use crate::Folio;

/// Load every article and write the output
pub fn run(folio: &Folio) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let report = folio.load()?;
    Generator::new(folio).generate(&report.index)?;

    tracing::info!(
        "Wrote {} articles to {:?} in {:.2}s",
        report.index.len(),
        folio.output_dir,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

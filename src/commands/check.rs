//! Validate content without writing output

use anyhow::Result;

use crate::Folio;

/// Print every problem found; fail if any article was excluded
pub fn run(folio: &Folio) -> Result<()> {
    let report = folio.load()?;

    for failure in &report.failures {
        println!("  error: {}", failure);
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }

    println!(
        "{} articles ok, {} failed, {} warnings, {} drafts",
        report.index.len(),
        report.failures.len(),
        report.warnings.len(),
        report.drafts.len()
    );

    if !report.is_clean() {
        anyhow::bail!("{} article(s) failed validation", report.failures.len());
    }

    Ok(())
}

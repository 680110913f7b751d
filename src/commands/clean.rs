//! Clean the output directory

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Delete the output directory
pub fn run(folio: &Folio) -> Result<()> {
    if folio.output_dir.exists() {
        fs::remove_dir_all(&folio.output_dir)?;
        tracing::info!("Deleted: {:?}", folio.output_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", folio.output_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clean() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        fs::create_dir_all(folio.output_dir.join("articles")).unwrap();
        fs::write(folio.output_dir.join("index.json"), "[]").unwrap();

        run(&folio).unwrap();
        assert!(!folio.output_dir.exists());

        // cleaning twice is fine
        run(&folio).unwrap();
    }
}

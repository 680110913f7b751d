//! Content loader - reads article files from a content directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::SiteConfig;
use crate::error::ContentError;

/// One article file as read from disk
#[derive(Debug, Clone)]
pub struct RawFile {
    pub path: PathBuf,
    pub content: String,
}

/// Loads raw article files from a directory
pub struct ContentLoader {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl ContentLoader {
    /// Create a loader using the site's content extensions
    pub fn new<P: AsRef<Path>>(dir: P, config: &SiteConfig) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extensions: config.extensions.clone(),
        }
    }

    /// Directory this loader reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lazily walk the directory, yielding one record per matching file.
    ///
    /// Files are read as the iterator advances. A file that cannot be read
    /// yields an error item; the walk continues with the next file.
    pub fn files(
        &self,
    ) -> Result<impl Iterator<Item = Result<RawFile, ContentError>> + '_, ContentError> {
        if !self.dir.is_dir() {
            return Err(ContentError::NotFound(format!(
                "content directory {:?}",
                self.dir
            )));
        }

        let iter = WalkDir::new(&self.dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(move |entry| match entry {
                Ok(entry) => (entry.file_type().is_file() && self.is_content_file(entry.path()))
                    .then(|| read_file(entry.path())),
                Err(e) => self.walk_error(e),
            });

        Ok(iter)
    }

    /// Entries that fail during the walk (broken links, permission errors)
    /// become error items when they look like content
    fn walk_error(&self, e: walkdir::Error) -> Option<Result<RawFile, ContentError>> {
        let path = e.path().map(Path::to_path_buf);
        if let Some(path) = &path {
            if !self.is_content_file(path) {
                tracing::warn!("Skipping unreadable entry: {}", e);
                return None;
            }
        }

        let path = path.unwrap_or_else(|| self.dir.clone());
        let message = e.to_string();
        let source = e
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
        Some(Err(ContentError::io(path, source)))
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

fn read_file(path: &Path) -> Result<RawFile, ContentError> {
    let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    tracing::debug!("Read {:?} ({} bytes)", path, content.len());
    Ok(RawFile {
        path: path.to_path_buf(),
        content,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map_or(false, |s| s.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(loader: &ContentLoader) -> Vec<String> {
        loader
            .files()
            .unwrap()
            .map(|f| {
                f.unwrap()
                    .path
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let loader = ContentLoader::new(tmp.path().join("nope"), &SiteConfig::default());
        assert!(matches!(loader.files(), Err(ContentError::NotFound(_))));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("post.md");
        fs::write(&file, "x").unwrap();
        let loader = ContentLoader::new(&file, &SiteConfig::default());
        assert!(matches!(loader.files(), Err(ContentError::NotFound(_))));
    }

    #[test]
    fn test_filters_by_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.md"), "b").unwrap();
        fs::write(tmp.path().join("a.markdown"), "a").unwrap();
        fs::write(tmp.path().join("notes.txt"), "skip").unwrap();
        fs::write(tmp.path().join("image.png"), "skip").unwrap();
        fs::write(tmp.path().join(".draft.md"), "hidden").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("c.MD"), "c").unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".git").join("d.md"), "d").unwrap();

        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        assert_eq!(names(&loader), vec!["a.markdown", "b.md", "c.MD"]);
    }

    #[test]
    fn test_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        assert_eq!(loader.files().unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_link_is_an_item_error() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "fine").unwrap();
        symlink(tmp.path().join("gone.md"), tmp.path().join("b.md")).unwrap();
        symlink(tmp.path().join("gone.png"), tmp.path().join("c.png")).unwrap();

        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        let files: Vec<_> = loader.files().unwrap().collect();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].as_ref().unwrap().content, "fine");
        match &files[1] {
            Err(ContentError::Io { path, .. }) => assert!(path.ends_with("b.md")),
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_file_is_an_item_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(tmp.path().join("b.md"), "fine").unwrap();

        let loader = ContentLoader::new(tmp.path(), &SiteConfig::default());
        let files: Vec<_> = loader.files().unwrap().collect();
        assert_eq!(files.len(), 2);
        assert!(matches!(files[0], Err(ContentError::Io { .. })));
        assert_eq!(files[1].as_ref().unwrap().content, "fine");
    }
}

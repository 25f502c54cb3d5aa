use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the files under a directory for the CLI. No filtering: callers that
/// need exclusion rules hand the analyzer their own file list.
pub struct FileScanner {
    follow_links: bool,
}

impl FileScanner {
    pub fn new() -> Self {
        Self {
            follow_links: false,
        }
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Absolute paths of every regular file below `root`, sorted.
    pub fn scan_directory(&self, root_path: &Path) -> Result<Vec<PathBuf>> {
        let root = std::fs::canonicalize(root_path)
            .with_context(|| format!("Invalid input path {}", root_path.display()))?;

        let mut files: Vec<PathBuf> = WalkDir::new(&root)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        Ok(files)
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

use std::path::{Component, Path, PathBuf};

use super::config::DEFAULT_RESOLVE_EXTENSIONS;
use super::graph::NodeId;

/// Maps raw import specifiers to dependency graph node identities.
///
/// Relative specifiers become absolute file paths, probed against the disk
/// with a fixed extension list. Anything else is a package name and passes
/// through untouched. Results are never cached.
#[derive(Debug, Clone)]
pub struct PathResolver {
    extensions: Vec<String>,
}

impl PathResolver {
    pub fn new() -> Self {
        Self::with_extensions(DEFAULT_RESOLVE_EXTENSIONS.iter().copied())
    }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn resolve(&self, from_file: &Path, specifier: &str) -> NodeId {
        if !is_relative(specifier) {
            return specifier.to_string();
        }

        let base = from_file.parent().unwrap_or_else(|| Path::new(""));
        let target = normalize(&base.join(specifier));
        let resolved = self.probe(&target).unwrap_or(target);
        resolved.to_string_lossy().into_owned()
    }

    /// Exact path, then `path + ext` per extension, then `path/index + ext`.
    fn probe(&self, target: &Path) -> Option<PathBuf> {
        if target.is_file() {
            return Some(target.to_path_buf());
        }

        let with_extensions = self.extensions.iter().map(|ext| {
            let mut candidate = target.as_os_str().to_os_string();
            candidate.push(ext);
            PathBuf::from(candidate)
        });
        let index_files = self
            .extensions
            .iter()
            .map(|ext| target.join(format!("index{ext}")));

        with_extensions
            .chain(index_files)
            .find(|candidate| candidate.is_file())
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with('.')
}

/// Lexically folds `.` and `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

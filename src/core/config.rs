use serde::{Deserialize, Serialize};

/// Extensions appended to relative import specifiers, probed in order.
pub const DEFAULT_RESOLVE_EXTENSIONS: &[&str] =
    &[".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".json"];

pub const DEFAULT_TOP_COMPONENTS: usize = 10;
pub const DEFAULT_TOP_DEPENDENCIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Upper bound on extraction worker threads; `None` uses rayon's default.
    pub max_workers: Option<usize>,
    pub resolve_extensions: Vec<String>,
    pub top_components: usize,
    pub top_dependencies: usize,
}

impl AnalyzerConfig {
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers.max(1));
        self
    }

    pub fn with_top(mut self, n: usize) -> Self {
        self.top_components = n;
        self.top_dependencies = n;
        self
    }

    pub fn with_resolve_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resolve_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_workers: None,
            resolve_extensions: DEFAULT_RESOLVE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            top_components: DEFAULT_TOP_COMPONENTS,
            top_dependencies: DEFAULT_TOP_DEPENDENCIES,
        }
    }
}

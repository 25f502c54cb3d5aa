use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::analytics::AnalyticsReport;
use super::config::AnalyzerConfig;
use super::graph::{DependencyGraph, GraphBuilder, RecordMap};
use super::resolver::PathResolver;
use crate::parsers::{self, SourceLanguage, SymbolRecord};

/// Everything one run produces for the documentation renderer.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: RecordMap,
    pub graph: DependencyGraph,
    pub report: AnalyticsReport,
    /// Files whose record is degraded (unreadable or unparseable).
    pub failed_files: Vec<PathBuf>,
}

pub struct CodebaseAnalyzer {
    config: AnalyzerConfig,
    resolver: PathResolver,
}

impl CodebaseAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        let resolver = PathResolver::with_extensions(config.resolve_extensions.iter().cloned());
        Self { config, resolver }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Runs extraction, graph building and analytics over `files`.
    ///
    /// A file that cannot be read or parsed still gets a record and is listed
    /// in [`Analysis::failed_files`]; it never aborts the batch.
    pub fn analyze(&self, files: &[PathBuf]) -> Result<Analysis> {
        info!("Extracting symbols from {} files", files.len());
        let records = self.extract_all(files)?;

        let failed_files: Vec<PathBuf> = records
            .values()
            .filter(|record| !record.parse_succeeded)
            .map(|record| record.path.clone())
            .collect();
        if !failed_files.is_empty() {
            warn!("{} files could not be analysed", failed_files.len());
        }

        info!("Building dependency graph");
        let graph = GraphBuilder::from_records(&records, &self.resolver);

        info!(
            "Computing graph summaries over {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        let report = AnalyticsReport::compute(
            &records,
            &graph,
            self.config.top_components,
            self.config.top_dependencies,
        );

        Ok(Analysis {
            records,
            graph,
            report,
            failed_files,
        })
    }

    fn extract_all(&self, files: &[PathBuf]) -> Result<RecordMap> {
        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(workers) = self.config.max_workers {
            pool = pool.num_threads(workers);
        }
        let pool = pool
            .build()
            .context("Failed to start extraction worker pool")?;

        let records: Vec<SymbolRecord> =
            pool.install(|| files.par_iter().map(|path| analyze_file(path)).collect());

        Ok(records
            .into_iter()
            .map(|record| (record.path.clone(), record))
            .collect())
    }
}

impl Default for CodebaseAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads and extracts one file. Read errors yield a degraded record.
pub fn analyze_file(path: &Path) -> SymbolRecord {
    let language = SourceLanguage::from_path(path);
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Failed to read {}: {err}", path.display());
            return SymbolRecord::failed(path, language, String::new());
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    let mut record = parsers::extract(path, &text, language);
    record.byte_size = bytes.len() as u64;
    record
}

pub mod analytics;
pub mod analyzer;
pub mod config;
pub mod graph;
pub mod resolver;
pub mod scanner;

pub use analytics::{AnalyticsReport, RankedName};
pub use analyzer::{Analysis, CodebaseAnalyzer};
pub use config::AnalyzerConfig;
pub use graph::{DependencyGraph, DependencyNode, GraphBuilder, NodeId, NodeKind, RecordMap};
pub use resolver::PathResolver;
pub use scanner::FileScanner;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use crate::core::{Analysis, NodeKind};
use crate::parsers::{SourceLanguage, SymbolRecord};

/// JSON rendering of an [`Analysis`] for the documentation renderer.
pub struct JsonCompactFormatter {
    /// Embed each file's raw text, which the renderer needs for code listings
    include_source: bool,
    pretty: bool,
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self {
            include_source: false,
            pretty: false,
        }
    }

    pub fn with_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format_to_file(&self, analysis: &Analysis, output_path: &Path) -> Result<()> {
        let json_content = self.format_analysis(analysis)?;
        fs::write(output_path, json_content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }

    pub fn format_analysis(&self, analysis: &Analysis) -> Result<String> {
        let output = self.to_value(analysis)?;
        let text = if self.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        Ok(text)
    }

    pub fn to_value(&self, analysis: &Analysis) -> Result<Value> {
        let files = analysis
            .records
            .values()
            .map(|record| self.file_entry(record))
            .collect::<Result<Vec<_>>>()?;

        let graph = &analysis.graph;
        let nodes: Vec<Value> = graph
            .nodes()
            .map(|node| {
                json!({
                    "id": node.id,
                    "k": kind_code(node.kind),
                    "out": graph.outbound(&node.id),
                    "in": graph.inbound(&node.id),
                })
            })
            .collect();

        let failed: Vec<String> = analysis
            .failed_files
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();

        Ok(json!({
            "meta": {
                "files": analysis.records.len(),
                "nodes": graph.node_count(),
                "edges": graph.edge_count(),
                "failed": failed,
                "format": if self.include_source { "full" } else { "compact" }
            },
            "files": files,
            "nodes": nodes,
            "analytics": serde_json::to_value(&analysis.report)?,
        }))
    }

    fn file_entry(&self, record: &SymbolRecord) -> Result<Value> {
        let mut entry = json!({
            "path": record.path.to_string_lossy(),
            "lang": record.language.name(),
            "ext": record.extension,
            "size": record.byte_size,
            "ok": record.parse_succeeded,
        });

        if record.language != SourceLanguage::Generic {
            entry["imports"] = serde_json::to_value(&record.imports)?;
            entry["exports"] = serde_json::to_value(&record.exports)?;
            entry["functions"] = serde_json::to_value(&record.functions)?;
            entry["classes"] = serde_json::to_value(&record.classes)?;
        }
        if let Some(types) = &record.type_constructs {
            entry["types"] = serde_json::to_value(types)?;
        }
        if record.skipped_constructs > 0 {
            entry["skipped"] = json!(record.skipped_constructs);
        }
        if self.include_source {
            entry["source"] = json!(record.raw_text);
        }

        Ok(entry)
    }
}

fn kind_code(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::File => 0,
        NodeKind::External => 1,
        NodeKind::Dangling => 2,
    }
}

impl Default for JsonCompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}

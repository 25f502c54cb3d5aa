pub mod common;
pub mod javascript;
pub mod record;
pub mod typescript;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub use common::ConstructError;
pub use record::{
    ClassInfo, ExportKind, ExportSpec, FunctionInfo, ImportSpec, InterfaceInfo, MethodInfo,
    PropertyInfo, SymbolRecord, TypeAliasInfo, TypeConstructs,
};

/// Syntax family of a source file, chosen once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLanguage {
    EcmaScript { jsx: bool },
    TypedSuperset { jsx: bool },
    Generic,
}

impl SourceLanguage {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("js" | "mjs" | "cjs") => SourceLanguage::EcmaScript { jsx: false },
            Some("jsx") => SourceLanguage::EcmaScript { jsx: true },
            Some("ts" | "mts" | "cts") => SourceLanguage::TypedSuperset { jsx: false },
            Some("tsx") => SourceLanguage::TypedSuperset { jsx: true },
            _ => SourceLanguage::Generic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SourceLanguage::EcmaScript { .. } => "javascript",
            SourceLanguage::TypedSuperset { .. } => "typescript",
            SourceLanguage::Generic => "generic",
        }
    }
}

/// Builds the symbol record for one file. Never fails: parser problems turn
/// into a record with `parse_succeeded == false` and empty structure.
pub fn extract(path: &Path, text: &str, language: SourceLanguage) -> SymbolRecord {
    let outcome = match language {
        SourceLanguage::EcmaScript { .. } => javascript::extract(path, text, language),
        SourceLanguage::TypedSuperset { .. } => typescript::extract(path, text, language),
        SourceLanguage::Generic => {
            return SymbolRecord::bare(path, language, text.to_string());
        }
    };

    match outcome {
        Ok(record) => record,
        Err(err) => {
            debug!("Parse failed for {}: {err}", path.display());
            SymbolRecord::failed(path, language, text.to_string())
        }
    }
}

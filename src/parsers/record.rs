use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::SourceLanguage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Specifier exactly as written, e.g. `./utils` or `react`.
    pub source: String,
    /// Local names bound by the import, in source order.
    pub bindings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportKind {
    Named,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSpec {
    pub kind: ExportKind,
    pub name: String,
}

impl ExportSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            kind: ExportKind::Named,
            name: name.into(),
        }
    }

    pub fn default_export(name: impl Into<String>) -> Self {
        Self {
            kind: ExportKind::Default,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<String>,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub is_static: bool,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub super_class: Option<String>,
    pub methods: Vec<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub properties: Vec<PropertyInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAliasInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConstructs {
    pub interfaces: Vec<InterfaceInfo>,
    pub type_aliases: Vec<TypeAliasInfo>,
}

/// Structural summary of one input file.
///
/// Every input path gets exactly one record. When reading or parsing fails the
/// structural fields stay empty and `parse_succeeded` is false; `raw_text` is
/// kept whenever the file could be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub path: PathBuf,
    pub language: SourceLanguage,
    pub extension: String,
    pub byte_size: u64,
    pub imports: Vec<ImportSpec>,
    pub exports: Vec<ExportSpec>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub type_constructs: Option<TypeConstructs>,
    pub raw_text: String,
    pub parse_succeeded: bool,
    /// Constructs dropped because their syntax node could not be read.
    pub skipped_constructs: usize,
}

impl SymbolRecord {
    /// A record carrying only file metadata and text.
    pub fn bare(path: &Path, language: SourceLanguage, raw_text: String) -> Self {
        Self {
            path: path.to_path_buf(),
            language,
            extension: path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
            byte_size: raw_text.len() as u64,
            imports: Vec::new(),
            exports: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            type_constructs: None,
            raw_text,
            parse_succeeded: true,
            skipped_constructs: 0,
        }
    }

    /// Degraded record for a file that could not be read or parsed.
    pub fn failed(path: &Path, language: SourceLanguage, raw_text: String) -> Self {
        Self {
            parse_succeeded: false,
            ..Self::bare(path, language, raw_text)
        }
    }

    pub fn import_sources(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(|import| import.source.as_str())
    }
}

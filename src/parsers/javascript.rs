use anyhow::{anyhow, Result};
use std::path::Path;
use tracing::debug;
use tree_sitter::Node as TSNode;

use super::common::{
    bound_names, field, find_child_by_kind, has_keyword, named_children, node_text,
    string_literal, ConstructError, ConstructResult, TreeSitterParser,
};
use super::record::{
    ClassInfo, ExportSpec, FunctionInfo, ImportSpec, InterfaceInfo, MethodInfo, SymbolRecord,
    TypeAliasInfo, TypeConstructs,
};
use super::{typescript, SourceLanguage};

/// Stand-in name for parameters that do not bind a single identifier.
pub const PATTERN_PARAM: &str = "<pattern>";

pub fn extract(path: &Path, text: &str, language: SourceLanguage) -> Result<SymbolRecord> {
    let mut parser = TreeSitterParser::new(tree_sitter_javascript::language())?;
    let tree = parser
        .parse_clean(text)
        .ok_or_else(|| anyhow!("syntax errors in {}", path.display()))?;

    let mut collector = ScriptCollector::new(text.as_bytes(), false);
    collector.visit_program(&tree.root_node());
    Ok(collector.into_record(path, language, text))
}

/// Single pass over the top-level statements of a script or module.
pub(crate) struct ScriptCollector<'s> {
    source: &'s [u8],
    typed: bool,
    imports: Vec<ImportSpec>,
    exports: Vec<ExportSpec>,
    functions: Vec<FunctionInfo>,
    classes: Vec<ClassInfo>,
    interfaces: Vec<InterfaceInfo>,
    type_aliases: Vec<TypeAliasInfo>,
    skipped: usize,
}

impl<'s> ScriptCollector<'s> {
    pub(crate) fn new(source: &'s [u8], typed: bool) -> Self {
        Self {
            source,
            typed,
            imports: Vec::new(),
            exports: Vec::new(),
            functions: Vec::new(),
            classes: Vec::new(),
            interfaces: Vec::new(),
            type_aliases: Vec::new(),
            skipped: 0,
        }
    }

    pub(crate) fn source(&self) -> &'s [u8] {
        self.source
    }

    /// Keeps a successfully read construct; counts and drops a failed one.
    pub(crate) fn record<T>(&mut self, result: ConstructResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                debug!("Skipping construct: {err}");
                self.skipped += 1;
                None
            }
        }
    }

    pub(crate) fn visit_program(&mut self, root: &TSNode) {
        for statement in named_children(root) {
            self.visit_statement(&statement);
        }
    }

    fn visit_statement(&mut self, node: &TSNode) {
        match node.kind() {
            "import_statement" => {
                let import = import_spec(node, self.source);
                if let Some(import) = self.record(import) {
                    self.imports.push(import);
                }
            }
            "export_statement" => self.visit_export(node),
            "function_declaration" | "generator_function_declaration" => {
                let function = function_info(node, self.source);
                if let Some(function) = self.record(function) {
                    self.functions.push(function);
                }
            }
            "class_declaration" | "abstract_class_declaration" => {
                let class = self.class_info(node);
                if let Some(class) = self.record(class) {
                    self.classes.push(class);
                }
            }
            "lexical_declaration" | "variable_declaration" => self.visit_requires(node),
            "ambient_declaration" => {
                if let Some(inner) = named_children(node).into_iter().next() {
                    self.visit_statement(&inner);
                }
            }
            "interface_declaration" if self.typed => {
                let interface = typescript::interface_info(self, node);
                if let Some(interface) = self.record(interface) {
                    self.interfaces.push(interface);
                }
            }
            "type_alias_declaration" if self.typed => {
                let alias = typescript::type_alias_info(node, self.source);
                if let Some(alias) = self.record(alias) {
                    self.type_aliases.push(alias);
                }
            }
            _ => {}
        }
    }

    fn visit_export(&mut self, node: &TSNode) {
        if let Some(source_node) = node.child_by_field_name("source") {
            let reexport = self.reexport(node, &source_node);
            if let Some(import) = self.record(reexport) {
                self.imports.push(import);
            }
            return;
        }

        if has_keyword(node, "default") {
            let name = default_export_name(node, self.source);
            if let Some(name) = self.record(name) {
                self.exports.push(ExportSpec::default_export(name));
            }
            let target = node
                .child_by_field_name("declaration")
                .or_else(|| node.child_by_field_name("value"));
            if let Some(target) = target {
                self.visit_default_target(&target);
            }
            return;
        }

        if let Some(clause) = find_child_by_kind(node, "export_clause") {
            for specifier in named_children(&clause) {
                let name = exported_name(&specifier, self.source);
                if let Some(name) = self.record(name) {
                    self.exports.push(ExportSpec::named(name));
                }
            }
            return;
        }

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let names = declared_names(&declaration, self.source);
            if let Some(names) = self.record(names) {
                self.exports.extend(names.into_iter().map(ExportSpec::named));
            }
            self.visit_statement(&declaration);
        }
    }

    /// `export default` may wrap a declaration or a named function/class expression.
    fn visit_default_target(&mut self, target: &TSNode) {
        let named = target.child_by_field_name("name").is_some();
        match target.kind() {
            "function" | "function_expression" | "generator_function" if named => {
                let function = function_info(target, self.source);
                if let Some(function) = self.record(function) {
                    self.functions.push(function);
                }
            }
            "class" if named => {
                let class = self.class_info(target);
                if let Some(class) = self.record(class) {
                    self.classes.push(class);
                }
            }
            _ => self.visit_statement(target),
        }
    }

    /// `export … from 'x'` both exports names and depends on `x`.
    fn reexport(&mut self, node: &TSNode, source_node: &TSNode) -> ConstructResult<ImportSpec> {
        let source = string_literal(source_node, self.source)?;

        let exported = if let Some(clause) = find_child_by_kind(node, "export_clause") {
            named_children(&clause)
                .iter()
                .map(|specifier| exported_name(specifier, self.source))
                .collect::<ConstructResult<Vec<_>>>()?
        } else if let Some(namespace) = find_child_by_kind(node, "namespace_export") {
            let name_node = named_children(&namespace)
                .into_iter()
                .next()
                .ok_or(ConstructError::Malformed {
                    kind: "namespace_export",
                })?;
            vec![string_or_identifier(&name_node, self.source)?]
        } else {
            // `export * from 'x'` re-exports without naming anything
            return Ok(ImportSpec {
                source,
                bindings: vec!["*".to_string()],
            });
        };

        // nothing is recorded unless the whole statement was readable
        self.exports
            .extend(exported.iter().cloned().map(ExportSpec::named));
        Ok(ImportSpec {
            source,
            bindings: exported,
        })
    }

    /// CommonJS: `const x = require('./x')` counts as an import.
    fn visit_requires(&mut self, node: &TSNode) {
        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            if let Some(import) = require_spec(&declarator, self.source) {
                if let Some(import) = self.record(import) {
                    self.imports.push(import);
                }
            }
        }
    }

    fn class_info(&mut self, node: &TSNode) -> ConstructResult<ClassInfo> {
        let kind = "class_declaration";
        let name = node_text(&field(node, kind, "name")?, self.source)?.to_string();
        let super_class = match find_child_by_kind(node, "class_heritage") {
            Some(heritage) => superclass_name(&heritage, self.source)?,
            None => None,
        };

        let body = field(node, kind, "body")?;
        let mut methods = Vec::new();
        for member in named_children(&body) {
            if member.kind() != "method_definition" {
                continue;
            }
            let method = method_info(&member, self.source);
            if let Some(method) = self.record(method) {
                methods.push(method);
            }
        }

        Ok(ClassInfo {
            name,
            super_class,
            methods,
        })
    }

    pub(crate) fn into_record(
        self,
        path: &Path,
        language: SourceLanguage,
        text: &str,
    ) -> SymbolRecord {
        let type_constructs = self.typed.then(|| TypeConstructs {
            interfaces: self.interfaces,
            type_aliases: self.type_aliases,
        });
        SymbolRecord {
            imports: self.imports,
            exports: self.exports,
            functions: self.functions,
            classes: self.classes,
            type_constructs,
            skipped_constructs: self.skipped,
            ..SymbolRecord::bare(path, language, text.to_string())
        }
    }
}

fn import_spec(node: &TSNode, source: &[u8]) -> ConstructResult<ImportSpec> {
    let kind = "import_statement";

    // TypeScript `import x = require('y')`
    if let Some(require) = find_child_by_kind(node, "import_require_clause") {
        let literal = find_child_by_kind(&require, "string")
            .ok_or(ConstructError::MissingField { kind, field: "source" })?;
        let local = find_child_by_kind(&require, "identifier")
            .ok_or(ConstructError::Malformed { kind })?;
        return Ok(ImportSpec {
            source: string_literal(&literal, source)?,
            bindings: vec![node_text(&local, source)?.to_string()],
        });
    }

    let spec_source = string_literal(&field(node, kind, "source")?, source)?;
    let mut bindings = Vec::new();

    if let Some(clause) = find_child_by_kind(node, "import_clause") {
        for part in named_children(&clause) {
            match part.kind() {
                "identifier" => bindings.push(node_text(&part, source)?.to_string()),
                "namespace_import" => {
                    let local = find_child_by_kind(&part, "identifier")
                        .ok_or(ConstructError::Malformed { kind: "namespace_import" })?;
                    bindings.push(node_text(&local, source)?.to_string());
                }
                "named_imports" => {
                    for specifier in named_children(&part) {
                        if specifier.kind() != "import_specifier" {
                            continue;
                        }
                        let local = specifier
                            .child_by_field_name("alias")
                            .or_else(|| specifier.child_by_field_name("name"))
                            .ok_or(ConstructError::MissingField {
                                kind: "import_specifier",
                                field: "name",
                            })?;
                        bindings.push(string_or_identifier(&local, source)?);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(ImportSpec {
        source: spec_source,
        bindings,
    })
}

fn require_spec(declarator: &TSNode, source: &[u8]) -> Option<ConstructResult<ImportSpec>> {
    let value = declarator.child_by_field_name("value")?;
    if value.kind() != "call_expression" {
        return None;
    }
    let callee = value.child_by_field_name("function")?;
    if callee.kind() != "identifier" || node_text(&callee, source).ok()? != "require" {
        return None;
    }
    let arguments = value.child_by_field_name("arguments")?;
    let literal = named_children(&arguments).into_iter().next()?;
    if literal.kind() != "string" {
        return None;
    }

    let bindings = match declarator.child_by_field_name("name") {
        Some(name) => bound_names(&name, source),
        None => Ok(Vec::new()),
    };
    Some(bindings.and_then(|bindings| {
        Ok(ImportSpec {
            source: string_literal(&literal, source)?,
            bindings,
        })
    }))
}

pub(crate) fn function_info(node: &TSNode, source: &[u8]) -> ConstructResult<FunctionInfo> {
    let kind = "function_declaration";
    let name = node_text(&field(node, kind, "name")?, source)?.to_string();
    let parameters = field(node, kind, "parameters")?;

    let params = named_children(&parameters)
        .iter()
        .map(|param| param_name(param, source))
        .collect::<ConstructResult<Vec<_>>>()?;

    Ok(FunctionInfo {
        name,
        params,
        is_async: has_keyword(node, "async"),
        is_generator: node.kind() == "generator_function_declaration" || has_keyword(node, "*"),
    })
}

fn param_name(param: &TSNode, source: &[u8]) -> ConstructResult<String> {
    match param.kind() {
        "identifier" => Ok(node_text(param, source)?.to_string()),
        "required_parameter" | "optional_parameter" => {
            let pattern = field(param, "required_parameter", "pattern")?;
            if pattern.kind() == "identifier" && param.child_by_field_name("value").is_none() {
                Ok(node_text(&pattern, source)?.to_string())
            } else {
                Ok(PATTERN_PARAM.to_string())
            }
        }
        _ => Ok(PATTERN_PARAM.to_string()),
    }
}

fn method_info(node: &TSNode, source: &[u8]) -> ConstructResult<MethodInfo> {
    let name = field(node, "method_definition", "name")?;
    Ok(MethodInfo {
        name: string_or_identifier(&name, source)?,
        is_static: has_keyword(node, "static"),
        is_async: has_keyword(node, "async"),
    })
}

fn superclass_name(heritage: &TSNode, source: &[u8]) -> ConstructResult<Option<String>> {
    let target = match find_child_by_kind(heritage, "extends_clause") {
        Some(clause) => clause
            .child_by_field_name("value")
            .or_else(|| named_children(&clause).into_iter().next()),
        None if has_keyword(heritage, "extends") => named_children(heritage).into_iter().next(),
        None => None,
    };
    target
        .map(|node| node_text(&node, source).map(str::to_string))
        .transpose()
}

fn default_export_name(node: &TSNode, source: &[u8]) -> ConstructResult<String> {
    let target = node
        .child_by_field_name("declaration")
        .or_else(|| node.child_by_field_name("value"));
    let Some(target) = target else {
        return Ok("default".to_string());
    };
    if target.kind() == "identifier" {
        return Ok(node_text(&target, source)?.to_string());
    }
    match target.child_by_field_name("name") {
        Some(name) => Ok(node_text(&name, source)?.to_string()),
        None => Ok("default".to_string()),
    }
}

fn exported_name(specifier: &TSNode, source: &[u8]) -> ConstructResult<String> {
    let name = specifier
        .child_by_field_name("alias")
        .or_else(|| specifier.child_by_field_name("name"))
        .ok_or(ConstructError::MissingField {
            kind: "export_specifier",
            field: "name",
        })?;
    string_or_identifier(&name, source)
}

/// Names that may be written as string literals: export specifiers
/// (`export { x as "y" }`) and quoted members (`'q'() {}`).
pub(crate) fn string_or_identifier(node: &TSNode, source: &[u8]) -> ConstructResult<String> {
    if node.kind() == "string" {
        string_literal(node, source)
    } else {
        Ok(node_text(node, source)?.to_string())
    }
}

/// Names introduced by an exported declaration; one entry per bound name.
fn declared_names(declaration: &TSNode, source: &[u8]) -> ConstructResult<Vec<String>> {
    match declaration.kind() {
        "lexical_declaration" | "variable_declaration" => {
            let mut names = Vec::new();
            for declarator in named_children(declaration) {
                if declarator.kind() != "variable_declarator" {
                    continue;
                }
                let name = field(&declarator, "variable_declarator", "name")?;
                names.extend(bound_names(&name, source)?);
            }
            Ok(names)
        }
        // `declare …` wraps the real declaration
        "ambient_declaration" => match named_children(declaration).into_iter().next() {
            Some(inner) => declared_names(&inner, source),
            None => Err(ConstructError::Malformed {
                kind: "ambient_declaration",
            }),
        },
        _ => {
            let name = field(declaration, "declaration", "name")?;
            Ok(vec![node_text(&name, source)?.to_string()])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn run(code: &str) -> SymbolRecord {
        extract(
            &PathBuf::from("/repo/src/sample.js"),
            code,
            SourceLanguage::EcmaScript { jsx: false },
        )
        .unwrap()
    }

    #[test]
    fn params_fall_back_to_placeholder_for_patterns() {
        let record = run("function f(a, { b }, [c], d = 1, ...rest) {}\n");
        assert_eq!(
            record.functions[0].params,
            vec!["a", PATTERN_PARAM, PATTERN_PARAM, PATTERN_PARAM, PATTERN_PARAM]
        );
    }

    #[test]
    fn require_calls_become_imports() {
        let record = run("const fs = require('fs');\nconst { join, resolve } = require('./paths');\n");
        assert_eq!(record.imports.len(), 2);
        assert_eq!(record.imports[0].source, "fs");
        assert_eq!(record.imports[0].bindings, vec!["fs"]);
        assert_eq!(record.imports[1].source, "./paths");
        assert_eq!(record.imports[1].bindings, vec!["join", "resolve"]);
    }

    #[test]
    fn reexports_are_both_exports_and_imports() {
        let record = run("export { a, b as c } from './lib';\nexport * from './all';\n");
        assert_eq!(
            record.exports,
            vec![ExportSpec::named("a"), ExportSpec::named("c")]
        );
        assert_eq!(record.imports[0].source, "./lib");
        assert_eq!(record.imports[0].bindings, vec!["a", "c"]);
        assert_eq!(record.imports[1].source, "./all");
        assert_eq!(record.imports[1].bindings, vec!["*"]);
    }

    #[test]
    fn reexport_names_match_their_import_bindings() {
        let record = run("export * as tools from './tools';\nexport { x as \"y\" } from './x';\n");
        assert_eq!(record.skipped_constructs, 0);
        let exported: Vec<&str> = record.exports.iter().map(|e| e.name.as_str()).collect();
        let bound: Vec<&str> = record
            .imports
            .iter()
            .flat_map(|i| i.bindings.iter().map(String::as_str))
            .collect();
        assert_eq!(exported, vec!["tools", "y"]);
        assert_eq!(exported, bound);
    }

    #[test]
    fn default_export_names() {
        let record = run("export default function main() {}\n");
        assert_eq!(record.exports, vec![ExportSpec::default_export("main")]);
        assert_eq!(record.functions[0].name, "main");

        let record = run("const App = 1;\nexport default App;\n");
        assert_eq!(record.exports, vec![ExportSpec::default_export("App")]);

        let record = run("export default { a: 1 };\n");
        assert_eq!(record.exports, vec![ExportSpec::default_export("default")]);
    }
}

use anyhow::{anyhow, Result};
use std::path::Path;
use tree_sitter::Node as TSNode;

use super::common::{field, named_children, node_text, ConstructResult, TreeSitterParser};
use super::javascript::{string_or_identifier, ScriptCollector};
use super::record::{InterfaceInfo, PropertyInfo, SymbolRecord, TypeAliasInfo};
use super::SourceLanguage;

/// Description used for any type the summary does not model.
pub const ANY_TYPE: &str = "any";

pub fn extract(path: &Path, text: &str, language: SourceLanguage) -> Result<SymbolRecord> {
    let grammar = match language {
        SourceLanguage::TypedSuperset { jsx: true } => tree_sitter_typescript::language_tsx(),
        _ => tree_sitter_typescript::language_typescript(),
    };
    let mut parser = TreeSitterParser::new(grammar)?;
    let tree = parser
        .parse_clean(text)
        .ok_or_else(|| anyhow!("syntax errors in {}", path.display()))?;

    let mut collector = ScriptCollector::new(text.as_bytes(), true);
    collector.visit_program(&tree.root_node());
    Ok(collector.into_record(path, language, text))
}

pub(crate) fn interface_info(
    collector: &mut ScriptCollector,
    node: &TSNode,
) -> ConstructResult<InterfaceInfo> {
    let source = collector.source();
    let kind = "interface_declaration";
    let name = node_text(&field(node, kind, "name")?, source)?.to_string();
    let body = field(node, kind, "body")?;

    let mut properties = Vec::new();
    for member in named_children(&body) {
        if member.kind() != "property_signature" {
            continue;
        }
        let property = property_info(&member, source);
        if let Some(property) = collector.record(property) {
            properties.push(property);
        }
    }

    Ok(InterfaceInfo { name, properties })
}

fn property_info(node: &TSNode, source: &[u8]) -> ConstructResult<PropertyInfo> {
    let name = field(node, "property_signature", "name")?;
    Ok(PropertyInfo {
        name: string_or_identifier(&name, source)?,
        type_name: annotated_type(node.child_by_field_name("type"), source),
    })
}

pub(crate) fn type_alias_info(node: &TSNode, source: &[u8]) -> ConstructResult<TypeAliasInfo> {
    let kind = "type_alias_declaration";
    let name = node_text(&field(node, kind, "name")?, source)?.to_string();
    let value = field(node, kind, "value")?;
    Ok(TypeAliasInfo {
        name,
        type_name: describe_type(&value, source),
    })
}

/// Unwraps a `: T` annotation; a missing annotation is unconstrained.
fn annotated_type(annotation: Option<TSNode>, source: &[u8]) -> String {
    annotation
        .and_then(|annotation| named_children(&annotation).into_iter().next())
        .map(|ty| describe_type(&ty, source))
        .unwrap_or_else(|| ANY_TYPE.to_string())
}

/// Syntactic type summary: keywords by name, arrays as `T[]`, references by
/// their referenced name, everything else `any`.
pub fn describe_type(node: &TSNode, source: &[u8]) -> String {
    let text = |n: &TSNode| {
        node_text(n, source)
            .map(str::to_string)
            .unwrap_or_else(|_| ANY_TYPE.to_string())
    };

    match node.kind() {
        "predefined_type" | "type_identifier" | "nested_type_identifier" => text(node),
        "array_type" => match named_children(node).into_iter().next() {
            Some(element) => format!("{}[]", describe_type(&element, source)),
            None => ANY_TYPE.to_string(),
        },
        "generic_type" => node
            .child_by_field_name("name")
            .or_else(|| named_children(node).into_iter().next())
            .map(|name| text(&name))
            .unwrap_or_else(|| ANY_TYPE.to_string()),
        _ => ANY_TYPE.to_string(),
    }
}

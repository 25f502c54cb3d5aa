use anyhow::Result;
use thiserror::Error;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

/// Why a single construct was left out of a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructError {
    #[error("`{kind}` node has no `{field}` child")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },
    #[error("`{kind}` node has an unexpected shape")]
    Malformed { kind: &'static str },
    #[error("node text is not valid UTF-8")]
    InvalidText,
}

pub type ConstructResult<T> = std::result::Result<T, ConstructError>;

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        parser.set_language(language)?;
        Ok(Self { parser })
    }

    /// Parses `source`, returning `None` when tree-sitter gives up or the tree
    /// contains error nodes.
    pub fn parse_clean(&mut self, source: &str) -> Option<Tree> {
        let tree = self.parser.parse(source, None)?;
        if tree.root_node().has_error() {
            return None;
        }
        Some(tree)
    }
}

pub fn node_text<'a>(node: &TSNode, source: &'a [u8]) -> ConstructResult<&'a str> {
    source
        .get(node.byte_range())
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .ok_or(ConstructError::InvalidText)
}

pub fn field<'t>(
    node: &TSNode<'t>,
    kind: &'static str,
    name: &'static str,
) -> ConstructResult<TSNode<'t>> {
    node.child_by_field_name(name)
        .ok_or(ConstructError::MissingField { kind, field: name })
}

/// Text of a string literal without its surrounding quotes.
pub fn string_literal(node: &TSNode, source: &[u8]) -> ConstructResult<String> {
    if node.kind() != "string" {
        return Err(ConstructError::Malformed { kind: "string" });
    }
    let text = node_text(node, source)?;
    let unquoted = text
        .strip_prefix(['"', '\''])
        .and_then(|t| t.strip_suffix(['"', '\'']))
        .ok_or(ConstructError::Malformed { kind: "string" })?;
    Ok(unquoted.to_string())
}

/// True when `node` has an anonymous child token spelled `keyword`.
pub fn has_keyword(node: &TSNode, keyword: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == keyword);
    found
}

pub fn find_child_by_kind<'a>(node: &TSNode<'a>, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

pub fn named_children<'a>(node: &TSNode<'a>) -> Vec<TSNode<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Identifiers bound by a declarator name, which may be a destructuring pattern.
pub fn bound_names(pattern: &TSNode, source: &[u8]) -> ConstructResult<Vec<String>> {
    match pattern.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            Ok(vec![node_text(pattern, source)?.to_string()])
        }
        "object_pattern" | "array_pattern" => {
            let mut names = Vec::new();
            for child in named_children(pattern) {
                names.extend(bound_names(&child, source)?);
            }
            Ok(names)
        }
        "pair_pattern" => bound_names(&field(pattern, "pair_pattern", "value")?, source),
        "assignment_pattern" | "object_assignment_pattern" => {
            bound_names(&field(pattern, "assignment_pattern", "left")?, source)
        }
        "rest_pattern" => match named_children(pattern).first() {
            Some(inner) => bound_names(inner, source),
            None => Err(ConstructError::Malformed { kind: "rest_pattern" }),
        },
        _ => Ok(Vec::new()),
    }
}

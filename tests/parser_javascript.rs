use codeatlas::parsers::javascript::PATTERN_PARAM;
use codeatlas::parsers::{extract, ExportKind, ExportSpec, SourceLanguage};
use std::path::PathBuf;

fn js(code: &str) -> codeatlas::parsers::SymbolRecord {
    extract(
        &PathBuf::from("/repo/src/sample.js"),
        code,
        SourceLanguage::EcmaScript { jsx: false },
    )
}

#[test]
fn javascript_parser_extracts_imports_exports_functions_and_classes() {
    let code = r#"
import React, { useState as useLocalState, useEffect } from 'react';
import * as utils from './utils';
import './styles.css';

export const answer = 42, other = 'x';
export { helper as publicHelper };

export async function load(url, { retries }) {
  return fetch(url);
}

function* ids() { yield 1; }

class Base {}

export class Widget extends Base {
  static create() { return new Widget(); }
  async render() {}
  constructor(props) { super(); }
}

function helper() {}
"#;
    let record = js(code);
    assert!(record.parse_succeeded);
    assert_eq!(record.raw_text, code);

    assert_eq!(record.imports.len(), 3);
    assert_eq!(record.imports[0].source, "react");
    assert_eq!(
        record.imports[0].bindings,
        vec!["React", "useLocalState", "useEffect"]
    );
    assert_eq!(record.imports[1].source, "./utils");
    assert_eq!(record.imports[1].bindings, vec!["utils"]);
    assert_eq!(record.imports[2].source, "./styles.css");
    assert!(record.imports[2].bindings.is_empty());

    let export_names: Vec<&str> = record.exports.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        export_names,
        vec!["answer", "other", "publicHelper", "load", "Widget"]
    );
    assert!(record.exports.iter().all(|e| e.kind == ExportKind::Named));

    let load = record.functions.iter().find(|f| f.name == "load").unwrap();
    assert!(load.is_async);
    assert!(!load.is_generator);
    assert_eq!(load.params, vec!["url", PATTERN_PARAM]);

    let ids = record.functions.iter().find(|f| f.name == "ids").unwrap();
    assert!(ids.is_generator);
    assert!(record.functions.iter().any(|f| f.name == "helper"));

    assert_eq!(record.classes.len(), 2);
    let widget = &record.classes[1];
    assert_eq!(widget.name, "Widget");
    assert_eq!(widget.super_class.as_deref(), Some("Base"));
    let methods: Vec<(&str, bool, bool)> = widget
        .methods
        .iter()
        .map(|m| (m.name.as_str(), m.is_static, m.is_async))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("create", true, false),
            ("render", false, true),
            ("constructor", false, false)
        ]
    );
    assert!(record.classes[0].super_class.is_none());
    assert!(record.type_constructs.is_none());
}

#[test]
fn jsx_files_parse_with_the_script_grammar() {
    let code = "import Button from './Button';\nexport default function App() { return <Button label=\"hi\" />; }\n";
    let record = extract(
        &PathBuf::from("/repo/src/App.jsx"),
        code,
        SourceLanguage::EcmaScript { jsx: true },
    );
    assert!(record.parse_succeeded);
    assert_eq!(record.imports[0].source, "./Button");
    assert_eq!(record.exports, vec![ExportSpec::default_export("App")]);
}

#[test]
fn anonymous_default_export_uses_default_token() {
    let record = js("export default class extends Array {}\n");
    assert_eq!(record.exports, vec![ExportSpec::default_export("default")]);
}

#[test]
fn nested_declarations_are_not_top_level() {
    let record = js("function outer() { function inner() {} class Hidden {} }\n");
    assert_eq!(record.functions.len(), 1);
    assert_eq!(record.functions[0].name, "outer");
    assert!(record.classes.is_empty());
}

#[test]
fn stray_brace_degrades_to_empty_record() {
    let code = "import { a } from './a';\nfunction broken() {\n  return 1;\n}}\n";
    let record = js(code);
    assert!(!record.parse_succeeded);
    assert_eq!(record.raw_text, code);
    assert!(record.imports.is_empty());
    assert!(record.exports.is_empty());
    assert!(record.functions.is_empty());
    assert!(record.classes.is_empty());
}

#[test]
fn extraction_survives_odd_input() {
    let inputs = ["", "\u{0}\u{1}\u{fffd}\u{7f}", "}{", "<<<<<<< HEAD\n"];
    for input in inputs {
        let record = js(input);
        assert_eq!(record.raw_text, input);
        if !record.parse_succeeded {
            assert!(record.imports.is_empty() && record.functions.is_empty());
        }
    }
    assert!(js("").parse_succeeded);
}

#[test]
fn quoted_method_names_are_unquoted() {
    let record = js("class Router { 'q'() {} \"get-all\"() {} static list() {} }\n");
    let methods: Vec<&str> = record.classes[0]
        .methods
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(methods, vec!["q", "get-all", "list"]);
}

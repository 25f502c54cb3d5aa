use codeatlas::core::{AnalyzerConfig, CodebaseAnalyzer, FileScanner, NodeKind};
use codeatlas::parsers::SourceLanguage;
use std::fs;

#[test]
fn analyzer_end_to_end_on_small_project() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("util")).unwrap();
    fs::write(root.join("a.js"), "import { x } from './b';\nexport const foo = 1;\n").unwrap();
    fs::write(root.join("b.js"), "import { y } from './a';\nexport const foo = 2;\n").unwrap();
    fs::write(
        root.join("util/helpers.ts"),
        "import _ from 'lodash';\nexport interface Point { x: number, y: number }\nexport const foo = 3;\n",
    )
    .unwrap();
    fs::write(root.join("bad.js"), "export function f() {\n}}\n").unwrap();
    fs::write(root.join("README.md"), "# project\n").unwrap();

    let files = FileScanner::new().scan_directory(root).unwrap();
    assert_eq!(files.len(), 5);

    let analysis = CodebaseAnalyzer::new().analyze(&files).unwrap();
    assert_eq!(analysis.records.len(), 5);

    let a = files.iter().find(|p| p.ends_with("a.js")).unwrap();
    let b = files.iter().find(|p| p.ends_with("b.js")).unwrap();
    let helpers = files.iter().find(|p| p.ends_with("util/helpers.ts")).unwrap();
    let bad = files.iter().find(|p| p.ends_with("bad.js")).unwrap();
    let readme = files.iter().find(|p| p.ends_with("README.md")).unwrap();
    let id = |p: &std::path::PathBuf| p.to_string_lossy().into_owned();

    // mutual imports resolve both ways
    assert_eq!(analysis.graph.outbound(&id(a)), vec![id(b)]);
    assert_eq!(analysis.graph.outbound(&id(b)), vec![id(a)]);
    assert_eq!(analysis.graph.node("lodash").unwrap().kind, NodeKind::External);

    let point = &analysis.records[helpers].type_constructs.as_ref().unwrap().interfaces[0];
    assert_eq!(point.name, "Point");
    assert!(point.properties.iter().all(|p| p.type_name == "number"));

    let bad_record = &analysis.records[bad];
    assert!(!bad_record.parse_succeeded);
    assert_eq!(bad_record.raw_text, "export function f() {\n}}\n");
    assert_eq!(analysis.failed_files, vec![bad.clone()]);

    let readme_record = &analysis.records[readme];
    assert_eq!(readme_record.language, SourceLanguage::Generic);
    assert_eq!(readme_record.byte_size, 10);

    let report = &analysis.report;
    assert_eq!(report.main_components[0].name, "foo");
    assert_eq!(report.main_components[0].count, 3);
    assert!(report
        .flows
        .iter()
        .any(|flow| flow.len() == 2 && flow.contains(&id(a)) && flow.contains(&id(b))));
    assert_eq!(report.circular_dependencies, vec![{
        let mut pair = vec![id(a), id(b)];
        pair.sort();
        pair
    }]);
}

#[test]
fn unreadable_files_get_degraded_records() {
    let dir = tempfile::TempDir::new().unwrap();
    let present = dir.path().join("present.js");
    let vanished = dir.path().join("vanished.js");
    fs::write(&present, "import './vanished.js';\n").unwrap();

    let analyzer = CodebaseAnalyzer::with_config(AnalyzerConfig::default().with_max_workers(2));
    let analysis = analyzer
        .analyze(&[present.clone(), vanished.clone()])
        .unwrap();

    assert_eq!(analysis.records.len(), 2);
    let record = &analysis.records[&vanished];
    assert!(!record.parse_succeeded);
    assert!(record.raw_text.is_empty());
    assert_eq!(analysis.failed_files, vec![vanished.clone()]);

    // the import still points at the (unreadable) file's node
    let target = vanished.to_string_lossy().into_owned();
    assert_eq!(
        analysis.graph.outbound(&present.to_string_lossy()),
        vec![target.clone()]
    );
    assert_eq!(analysis.graph.node(&target).unwrap().kind, NodeKind::File);
}

#[test]
fn every_input_gets_exactly_one_record() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut files = Vec::new();
    for (i, body) in ["", "}{", "\u{feff}export {};", "import x from 'y'"].iter().enumerate() {
        let path = dir.path().join(format!("f{i}.js"));
        fs::write(&path, body).unwrap();
        files.push(path);
    }
    fs::write(dir.path().join("blob.bin"), [0u8, 159, 146, 150, 255]).unwrap();
    files.push(dir.path().join("blob.bin"));

    let analysis = CodebaseAnalyzer::new().analyze(&files).unwrap();
    assert_eq!(analysis.records.len(), files.len());
    for path in &files {
        assert!(analysis.records.contains_key(path));
        assert!(analysis.graph.contains(&path.to_string_lossy()));
    }
    assert_eq!(analysis.records[&files[4]].byte_size, 5);
}

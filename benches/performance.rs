use codeatlas::core::{CodebaseAnalyzer, FileScanner, GraphBuilder, PathResolver};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::path::Path;
use tempfile::TempDir;

fn write_modules(dir: &Path, count: usize) {
    for i in 0..count {
        let next = (i + 1) % count;
        let content = format!(
            r#"
import {{ Service{next} }} from './service_{next}';
import lodash from 'lodash';

export interface Data{i} {{
    value: number;
    name: string;
    tags: string[];
}}

export class Service{i} extends Base {{
    constructor(private data: Data{i}) {{
        super();
    }}

    process(): number {{
        return this.calculate() * 2;
    }}

    static create(value: number): Service{i} {{
        return new Service{i}({{ value, name: "test{i}", tags: [] }});
    }}

    private calculate(): number {{
        return this.data.value + 10;
    }}
}}

export type Handler{i} = (data: Data{i}) => void;

export async function run{i}(input: number, options?: object) {{
    return lodash.identity(input);
}}
"#
        );
        std::fs::write(dir.join(format!("service_{i}.ts")), content).unwrap();
    }

    for i in 0..count / 2 {
        let content = format!(
            r#"
const {{ helper }} = require('./helpers');
import React from 'react';

export default function Widget{i}(props) {{
    return <div>{{helper(props)}}</div>;
}}
"#
        );
        std::fs::write(dir.join(format!("widget_{i}.jsx")), content).unwrap();
    }
}

fn benchmark_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("codebase_analysis");

    let small = TempDir::new().unwrap();
    write_modules(small.path(), 10);
    let small_files = FileScanner::new().scan_directory(small.path()).unwrap();

    group.bench_function("small_codebase", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new();
            black_box(analyzer.analyze(black_box(&small_files)))
        });
    });

    let large = TempDir::new().unwrap();
    write_modules(large.path(), 200);
    let large_files = FileScanner::new().scan_directory(large.path()).unwrap();

    group.bench_function("large_codebase", |b| {
        b.iter(|| {
            let analyzer = CodebaseAnalyzer::new();
            black_box(analyzer.analyze(black_box(&large_files)))
        });
    });

    group.finish();
}

fn benchmark_graph(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    write_modules(dir.path(), 200);
    let files = FileScanner::new().scan_directory(dir.path()).unwrap();
    let analysis = CodebaseAnalyzer::new().analyze(&files).unwrap();
    let resolver = PathResolver::new();

    let mut group = c.benchmark_group("dependency_graph");
    group.bench_function("build_from_records", |b| {
        b.iter(|| black_box(GraphBuilder::from_records(black_box(&analysis.records), &resolver)));
    });
    group.finish();
}

criterion_group!(benches, benchmark_analysis, benchmark_graph);
criterion_main!(benches);

//! Conversion performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use css2android::*;
use std::fs;
use tempfile::TempDir;

fn bench_simple_conversion(c: &mut Criterion) {
    let content = ".title { color: #FF0000; font-size: 1rem; }";

    c.bench_function("simple_conversion", |b| {
        b.iter(|| convert_source(black_box(content)))
    });
}

fn generate_stylesheet(rules: usize) -> String {
    let mut content = String::from(":root {\n  --brand: #112233;\n  --gap: 4px 8px;\n}\n");
    for i in 0..rules {
        content.push_str(&format!(
            ".item-{i} {{\n  color: var(--brand);\n  font-size: {}rem;\n  padding: var(--gap);\n  width: {}%;\n}}\n",
            1 + i % 3,
            i % 100
        ));
    }
    content
}

fn bench_large_file_conversion(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("large.css");
    let output_path = temp_dir.path().join("large.xml");

    fs::write(&input_path, generate_stylesheet(1000)).unwrap();

    c.bench_function("large_file_conversion", |b| {
        b.iter(|| {
            convert_file(
                black_box(input_path.to_str().unwrap()),
                black_box(output_path.to_str().unwrap()),
            )
            .unwrap()
        })
    });
}

fn bench_output_modes(c: &mut Criterion) {
    let content = generate_stylesheet(200);
    let mut group = c.benchmark_group("output_modes");

    for mode in [OutputMode::Styles, OutputMode::Colors] {
        let options = ConvertOptions {
            mode,
            ..Default::default()
        };
        group.bench_with_input(mode.to_string(), &options, |b, options| {
            b.iter(|| convert_source_with_options(black_box(&content), options))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_simple_conversion,
    bench_large_file_conversion,
    bench_output_modes
);
criterion_main!(benches);

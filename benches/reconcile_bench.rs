use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_feature_editor::FeatureEditor;
use serde_json::{json, Value};
use std::hint::black_box;

fn build_synthetic_collection(feature_count: usize) -> Value {
    let features: Vec<Value> = (0..feature_count)
        .map(|index| {
            let column = (index % 1000) as f64;
            let row = (index / 1000) as f64;
            json!({
                "type": "Feature",
                "id": format!("f{index}"),
                "properties": {"index": index},
                "geometry": {"type": "Point", "coordinates": [column, row]},
            })
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

fn bench_replace_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_all");

    for &feature_count in &[1_000usize, 10_000usize] {
        let collection = build_synthetic_collection(feature_count);

        group.bench_with_input(
            BenchmarkId::new("cold", feature_count),
            &collection,
            |b, collection| {
                b.iter(|| {
                    let mut editor = FeatureEditor::new();
                    let ids = editor.set(black_box(collection)).expect("set failed");
                    black_box(ids.len())
                })
            },
        );

        // Unveränderte Eingabe: reiner Diff-Pfad ohne Koordinaten-Mutation
        group.bench_with_input(
            BenchmarkId::new("unchanged", feature_count),
            &collection,
            |b, collection| {
                let mut editor = FeatureEditor::new();
                editor.set(collection).expect("set failed");
                b.iter(|| {
                    let ids = editor.set(black_box(collection)).expect("set failed");
                    black_box(ids.len())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_replace_all);
criterion_main!(benches);

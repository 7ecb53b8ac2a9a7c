//! Field classification benchmarks.
//!
//! Measures classification of single columns and of whole tables.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use harmony::{DataTable, FieldClassifier};

/// Generate a clinical-looking table: id, enum, integer, decimal, free text.
fn generate_table(rows: usize) -> DataTable {
    let sexes = ["F", "M", "unknown"];
    let sites = ["gut", "blood", "liver", "lung", "stool"];
    let headers = ["subject id", "sex", "site", "age", "bmi", "notes"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let data = (0..rows)
        .map(|row| {
            vec![
                format!("SUBJ-{:05}", row),
                sexes[row % sexes.len()].to_string(),
                sites[row % sites.len()].to_string(),
                (18 + row % 70).to_string(),
                format!("{:.1}", 18.5 + (row % 20) as f64 * 0.5),
                if row % 7 == 0 {
                    String::new()
                } else {
                    format!("visit {} ok", row % 13)
                },
            ]
        })
        .collect();

    DataTable::new(headers, data, b'\t')
}

fn bench_classify_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_column");
    let classifier = FieldClassifier::new();

    for rows in [100, 1_000, 10_000].iter() {
        let table = generate_table(*rows);
        group.throughput(Throughput::Elements(*rows as u64));

        for (index, name) in [(1, "enum"), (3, "integer"), (5, "text")] {
            let values: Vec<&str> = table.column_values(index).collect();
            group.bench_with_input(BenchmarkId::new(name, rows), &values, |b, values| {
                b.iter(|| classifier.classify(black_box("column"), black_box(values)))
            });
        }
    }

    group.finish();
}

fn bench_classify_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_table");
    let classifier = FieldClassifier::new();

    for rows in [100, 1_000, 10_000].iter() {
        let table = generate_table(*rows);
        group.throughput(Throughput::Elements((*rows * table.column_count()) as u64));
        group.bench_with_input(BenchmarkId::new("cells", rows), &table, |b, table| {
            b.iter(|| classifier.classify_table(black_box(table)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify_column, bench_classify_table);
criterion_main!(benches);

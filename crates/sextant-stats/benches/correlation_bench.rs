//! Criterion benchmarks for sextant-stats: correlation matrix and decomposition.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use sextant_stats::{Alignment, CorrelationConfig, decompose};
use sextant_table::{NumericSeries, Record, Table, extract};

fn make_table(n_rows: usize, n_columns: usize) -> Table {
    let records = (0..n_rows)
        .map(|i| {
            let mut record = Record::new().with("Date", format!("t{i}"));
            for c in 0..n_columns {
                let v = (i as f64 * 0.1 + c as f64).sin() * (c + 1) as f64;
                // every seventh cell of odd columns is missing; row 0 stays
                // populated so the column is discovered as numeric
                let cell = if c % 2 == 1 && i % 7 == 3 { None } else { Some(v) };
                record.insert(format!("c{c}"), cell);
            }
            record
        })
        .collect();
    Table::from_records(records)
}

fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_matrix");

    for &(rows, cols) in &[(256usize, 4usize), (1024, 8), (4096, 16)] {
        let table = make_table(rows, cols);
        for alignment in [Alignment::Positional, Alignment::SharedRows] {
            let id = BenchmarkId::new(format!("{rows}x{cols}"), format!("{alignment:?}"));
            let config = CorrelationConfig::new().with_alignment(alignment);
            group.bench_with_input(id, &table, |b, table| {
                b.iter(|| config.compute(table));
            });
        }
    }

    group.finish();
}

fn bench_decompose(c: &mut Criterion) {
    let table = make_table(4096, 1);
    let series: NumericSeries = extract(&table, "c0");

    c.bench_function("decompose_4096", |b| {
        b.iter(|| decompose(&series).unwrap());
    });
}

criterion_group!(benches, bench_correlation, bench_decompose);
criterion_main!(benches);

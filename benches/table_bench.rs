//! Benchmarks for the table engine
//!
//! Run with: cargo bench

use bi_tool::table::{CellValue, Column, FilterOption, Record, TableEngine};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const CITIES: [&str; 6] = [
    "New York",
    "Los Angeles",
    "Houston",
    "Phoenix",
    "San Diego",
    "Chicago",
];

fn create_rows(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut row = Record::new();
            row.insert("id".into(), CellValue::from(i as i64));
            row.insert("age".into(), CellValue::from((20 + i % 40) as i64));
            row.insert("city".into(), CellValue::from(CITIES[i % CITIES.len()]));
            row
        })
        .collect()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID"),
        Column::new("age", "Age").filter_options(
            (20..60)
                .map(|a| FilterOption::plain(a.to_string()))
                .collect(),
        ),
        Column::new("city", "City")
            .filter_options(CITIES.iter().map(|c| FilterOption::plain(*c)).collect()),
    ]
}

fn bench_apply_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_filters");

    for size in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut engine = TableEngine::new(create_rows(size), columns(), 25);
            b.iter(|| {
                engine.open_filter_editor();
                engine.toggle_filter_value("city", "Chicago", true);
                engine.toggle_filter_value("age", "30", true);
                engine.apply_filters();
                black_box(engine.filtered_count());
                engine.clear_all_committed_filters();
            })
        });
    }

    group.finish();
}

fn bench_pagination(c: &mut Criterion) {
    let mut engine = TableEngine::new(create_rows(10_000), columns(), 25);
    engine.open_filter_editor();
    engine.toggle_filter_value("city", "Houston", true);
    engine.apply_filters();

    c.bench_function("page_body", |b| {
        let pages = engine.page_count();
        let mut page = 0;
        b.iter(|| {
            engine.set_page(page % pages);
            page += 1;
            black_box(engine.body())
        })
    });
}

criterion_group!(benches, bench_apply_filters, bench_pagination);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use usagetable::*;

const REGIONS: [&str; 6] = ["Seoul", "Busan", "Daegu", "Incheon", "Gwangju", "Daejeon"];

fn make_records(size: usize) -> Vec<RawRecord> {
    (0..size)
        .map(|i| {
            let mut record = RawRecord::new();
            record.insert("region".to_string(), RawValue::from(REGIONS[i % REGIONS.len()]));
            record.insert("age".to_string(), RawValue::from((i % 90) as f64));
            record.insert("visit_days".to_string(), RawValue::from((i % 31) as f64));
            record.insert("total_duration_min".to_string(), RawValue::from((i % 600) as f64));
            record.insert("total_payment".to_string(), RawValue::from(((i * 37) % 20000).to_string()));
            record.insert("retained_90".to_string(), RawValue::from(i % 3 == 0));
            record
        })
        .collect()
}

fn bench_table_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_build");

    for size in [100, 1000, 10000].iter() {
        let records = make_records(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            let builder = TableBuilder::new("users");
            b.iter(|| builder.build(black_box(records.clone())));
        });
    }
    group.finish();
}

fn bench_aggregate_region(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_region");

    for size in [1000, 10000, 100000].iter() {
        let table = TableBuilder::new("users").build(make_records(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                aggregate(
                    &table,
                    Dimension::Region,
                    black_box(AggregateKind::Sum(NumericField::TotalPayment)),
                )
            });
        });
    }
    group.finish();
}

fn bench_aggregate_age_group(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_age_group");

    for size in [1000, 10000, 100000].iter() {
        let table = TableBuilder::new("users").build(make_records(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                aggregate(
                    &table,
                    Dimension::AgeGroup,
                    black_box(AggregateKind::MeanPercent(NumericField::Retained90)),
                )
            });
        });
    }
    group.finish();
}

fn bench_revenue_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("revenue_by_age_bracket");

    for size in [1000, 10000, 100000].iter() {
        let table = TableBuilder::new("users").build(make_records(*size));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| revenue_by_age_bracket(black_box(&table)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_table_build,
    bench_aggregate_region,
    bench_aggregate_age_group,
    bench_revenue_report,
);

criterion_main!(benches);

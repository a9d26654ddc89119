//! Throughput of the hardfork visitor entry points.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use opfork::prelude::*;

fn bench_entry_points(c: &mut Criterion) {
    let schedule = ActivationSchedule::mainnet();
    let now = TimePointSec::parse("2022-01-01T00:00:00").expect("timestamp");
    let visitor = HardforkVisitor::with_schedule(&schedule, now);
    let ops: Vec<Operation> = OperationKind::ALL
        .iter()
        .map(|kind| Operation::default_for(*kind))
        .collect();

    let mut group = c.benchmark_group("hardfork_visitor");

    group.bench_function("visit_kind", |b| {
        b.iter(|| {
            OperationKind::ALL
                .iter()
                .filter(|kind| visitor.visit_kind(black_box(**kind)))
                .count()
        })
    });

    group.bench_function("visit_tag", |b| {
        b.iter(|| {
            (0..OperationKind::COUNT as u64)
                .filter(|tag| visitor.visit_tag(black_box(*tag)).unwrap_or(false))
                .count()
        })
    });

    group.bench_function("visit_operation", |b| {
        b.iter(|| ops.iter().filter(|op| visitor.visit_operation(black_box(op))).count())
    });

    group.bench_function("dispatch_tag", |b| {
        let mut adaptor = visitor;
        b.iter(|| {
            (0..OperationKind::COUNT as u64)
                .filter(|tag| dispatch_tag(black_box(*tag), &mut adaptor).unwrap_or(false))
                .count()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_entry_points);
criterion_main!(benches);

//! Benchmarks for model assembly

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use truss_prep::prelude::*;

/// Planar Pratt-style truss with `bays` panels and alternating member areas
fn create_truss_tables(bays: usize) -> CaseTables {
    let mut coordinates = Vec::new();
    for i in 0..=bays {
        coordinates.push(CoordinateRow { x: i as f64, y: 0.0, z: 0.0 });
        coordinates.push(CoordinateRow { x: i as f64, y: 1.0, z: 0.0 });
    }

    let bottom = |i: usize| NodeId(2 * i + 1);
    let top = |i: usize| NodeId(2 * i + 2);
    let member = |start, end, k: usize| TopologyRow {
        start,
        end,
        area: if k % 2 == 0 { 0.01 } else { 0.02 },
        material: "polymer".to_string(),
    };

    let mut topology = Vec::new();
    for i in 0..bays {
        topology.push(member(bottom(i), bottom(i + 1), i));
        topology.push(member(top(i), top(i + 1), i + 1));
        topology.push(member(bottom(i), top(i + 1), i));
    }
    for i in 0..=bays {
        topology.push(member(bottom(i), top(i), i + 1));
    }

    let mut constraints = Vec::new();
    for axis_code in [4, 2, 1] {
        constraints.push(DirectionalRow { node: bottom(0), axis_code, magnitude: 0.0 });
    }
    for axis_code in [2, 1] {
        constraints.push(DirectionalRow { node: bottom(bays), axis_code, magnitude: 0.0 });
    }

    let forces = (1..bays)
        .map(|i| DirectionalRow { node: top(i), axis_code: 2, magnitude: -100.0 })
        .collect();

    CaseTables {
        case: "1".to_string(),
        topology,
        coordinates,
        forces,
        constraints,
    }
}

fn bench_assembly(c: &mut Criterion) {
    let tables = create_truss_tables(2_000);

    let per_element = RunConfig::default();
    c.bench_function("assemble_per_element_sections", |b| {
        b.iter(|| assemble_tables(black_box(&per_element), black_box(&tables)).unwrap())
    });

    let deduplicated = RunConfig {
        section_policy: SectionPolicy::Deduplicate,
        ..RunConfig::default()
    };
    c.bench_function("assemble_deduplicated_sections", |b| {
        b.iter(|| assemble_tables(black_box(&deduplicated), black_box(&tables)).unwrap())
    });
}

fn bench_deck(c: &mut Criterion) {
    let job = assemble_tables(&RunConfig::default(), &create_truss_tables(2_000)).unwrap();
    c.bench_function("render_calculix_deck", |b| {
        b.iter(|| truss_prep::solver::deck::render(black_box(&job)))
    });
}

criterion_group!(benches, bench_assembly, bench_deck);
criterion_main!(benches);

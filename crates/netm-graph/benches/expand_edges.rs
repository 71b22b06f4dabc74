use netm_graph::{convert_edges, ring, EdgeSelection, ExpandOptions, Lengths, RingOptions};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn expand_edges_bench(c: &mut Criterion) {
    let base = ring(RingOptions {
        nodes: 2_000,
        left: true,
        right: true,
        self_loops: false,
    })
    .unwrap();

    c.bench_function("expand_ring_2k_len4", |b| {
        b.iter_batched(
            || base.clone(),
            |mut graph| {
                let summary = convert_edges(
                    &mut graph,
                    &EdgeSelection::All,
                    &Lengths::Uniform(4),
                    &ExpandOptions::default(),
                )
                .unwrap();
                black_box(summary);
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, expand_edges_bench);
criterion_main!(benches);

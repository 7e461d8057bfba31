use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use strata::graph::{Graph, GraphOptions};
use strata::{layout, EdgeAttrs, LayoutConfig, LayoutGraph, NodeAttrs};

/// Deterministic pseudo-random DAG: `n` nodes in a rough grid with forward
/// edges, the shape layered layout sees in practice.
fn build_dag(n: usize) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: true,
    });
    g.set_graph(LayoutConfig::default());
    g.set_default_edge_label(EdgeAttrs::default);

    for i in 0..n {
        g.set_node(format!("n{i}"), NodeAttrs::sized(60.0, 30.0));
    }
    let mut state: u64 = 0x5DEECE66D;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    for i in 1..n {
        let parents = 1 + next() % 2;
        for _ in 0..parents {
            let p = next() % i;
            g.set_edge(format!("n{p}"), format!("n{i}"));
        }
    }
    g
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for n in [25usize, 100, 400] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || build_dag(n),
                |mut g| layout(&mut g),
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);

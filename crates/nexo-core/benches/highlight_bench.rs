//! # Highlight Benchmarks
//!
//! Performance benchmarks for nexo-core visual-state operations.
//!
//! Run with: `cargo bench -p nexo-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nexo_core::overlay::{PathEdge, PathNode};
use nexo_core::{
    Color, GraphEdge, GraphNode, GraphStateStore, HighlightMode, NodeId, OverlayEngine,
    PathOverlayEngine, PathResult, PathRole, SnippetMatcher, StateStore,
};
use std::collections::BTreeSet;
use std::hint::black_box;

/// Create a store with N nodes and a base edge from every node to its
/// successor.
fn create_chain_store(size: usize) -> GraphStateStore {
    let nodes = (0..size)
        .map(|i| GraphNode::new(NodeId::new(format!("n{i}")), "term", Some(Color::new("#888"))))
        .collect();
    let edges = (1..size)
        .map(|i| {
            GraphEdge::base(
                i - 1,
                NodeId::new(format!("n{}", i - 1)),
                NodeId::new(format!("n{i}")),
                "is_a",
                1.0,
                None,
            )
        })
        .collect();

    let mut store = GraphStateStore::new();
    store.set_base_graph(nodes, edges);
    store
}

/// A path over every fourth node, so most of its segments are overlays.
fn create_sparse_path(size: usize) -> PathResult {
    let ids: Vec<NodeId> = (0..size)
        .step_by(4)
        .map(|i| NodeId::new(format!("n{i}")))
        .collect();
    let nodes = ids
        .iter()
        .enumerate()
        .map(|(index, id)| PathNode {
            id: id.clone(),
            role: if index == 0 { PathRole::Start } else { PathRole::Member },
        })
        .collect();
    let edges = ids
        .windows(2)
        .map(|pair| PathEdge {
            source: pair[0].clone(),
            target: pair[1].clone(),
        })
        .collect();
    PathResult { nodes, edges }
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_highlight(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight");

    for size in [100, 1000, 5000].iter() {
        let targets: BTreeSet<NodeId> = (0..*size)
            .step_by(3)
            .map(|i| NodeId::new(format!("n{i}")))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut store = create_chain_store(size);
            b.iter(|| {
                store.highlight(black_box(&targets), HighlightMode::Path, None);
                black_box(store.refresh())
            });
        });
    }

    group.finish();
}

fn bench_show_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("show_path");

    for size in [100, 1000, 5000].iter() {
        let path = create_sparse_path(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut store = create_chain_store(size);
            b.iter(|| black_box(PathOverlayEngine.show_path(black_box(&path), &mut store)));
        });
    }

    group.finish();
}

fn bench_snippet(c: &mut Criterion) {
    let matcher = SnippetMatcher::default();
    let definition = "Catalysis of the transfer of a phosphate group, usually from ATP, \
                      to a substrate molecule; protein kinase activity in the cytoplasm.";

    c.bench_function("snippet", |b| {
        b.iter(|| black_box(matcher.snippet(black_box(definition), black_box("kinase"))));
    });
}

criterion_group!(benches, bench_highlight, bench_show_path, bench_snippet);
criterion_main!(benches);

//! Scope benchmarks
//!
//! Lookup and delegated-write cost through deep scope chains, and the
//! overhead of guarded execution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use exec_context_core::{Context, ExecOptions};

fn build_chain(depth: usize) -> (Context, Context) {
    let root = Context::new("root");
    root.set("owned_by_root", 0);
    let mut leaf = root.clone();
    for level in 0..depth {
        leaf = leaf.enter(format!("level{}", level)).expect("fresh scope is started");
    }
    (root, leaf)
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_get");
    for depth in [1usize, 8, 64] {
        let (_root, leaf) = build_chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, leaf| {
            b.iter(|| black_box(leaf.get(black_box("owned_by_root"))))
        });
    }
    group.finish();
}

fn bench_delegated_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("scope_set_delegated");
    for depth in [1usize, 8, 64] {
        let (_root, leaf) = build_chain(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &leaf, |b, leaf| {
            let mut n = 0u64;
            b.iter(|| {
                n += 1;
                leaf.set("owned_by_root", n);
            })
        });
    }
    group.finish();
}

fn bench_exec(c: &mut Criterion) {
    let root = Context::new("root");
    c.bench_function("exec_named", |b| {
        b.iter(|| {
            root.exec_with(ExecOptions::named("unit"), |ctx| black_box(ctx.name().len()))
                .expect("root is started")
        })
    });
}

criterion_group!(benches, bench_lookup, bench_delegated_set, bench_exec);
criterion_main!(benches);

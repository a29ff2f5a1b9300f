// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use myotome::model::{
    BodySide, MuscleKey, SelectionState, TaxonomyRegistry, Tier, ViewMode,
};
use myotome::query::{FilterColumn, FilterQueryResolver};

// Benchmark identity (keep stable):
// - Group names in this file: `selection.toggle`, `selection.rollup`,
//   `query.resolve`
// - Case IDs must remain stable across refactors so results stay comparable
//   over time.

fn bench_selection_toggle(c: &mut Criterion) {
    let registry = TaxonomyRegistry::builtin();
    let groups: Vec<MuscleKey> = registry.keys(Tier::Simple).cloned().collect();

    let mut group = c.benchmark_group("selection.toggle");
    group.bench_function("group_toggle_all_groups", |b| {
        b.iter_batched(
            SelectionState::new,
            |mut state| {
                for key in &groups {
                    black_box(state.toggle(registry, key, ViewMode::Simple));
                }
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("side_select_all_then_clear", |b| {
        b.iter_batched(
            SelectionState::new,
            |mut state| {
                black_box(state.select_all(registry, BodySide::Front));
                black_box(state.clear(registry, BodySide::Front));
                state
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_selection_rollup(c: &mut Criterion) {
    let registry = TaxonomyRegistry::builtin();
    let groups: Vec<MuscleKey> = registry.keys(Tier::Simple).cloned().collect();

    let mut state = SelectionState::new();
    state.select_all(registry, BodySide::Front);

    let mut group = c.benchmark_group("selection.rollup");
    group.bench_function("status_all_groups", |b| {
        b.iter(|| {
            for key in &groups {
                black_box(state.group_status(registry, key));
            }
        });
    });
    group.finish();
}

fn bench_query_resolve(c: &mut Criterion) {
    let registry = TaxonomyRegistry::builtin();
    let resolver = FilterQueryResolver::builtin();
    let keys: Vec<MuscleKey> = registry
        .keys(Tier::Simple)
        .chain(registry.keys(Tier::Advanced))
        .cloned()
        .collect();

    let mut group = c.benchmark_group("query.resolve");
    group.bench_function("all_keys_all_columns", |b| {
        b.iter(|| {
            for key in &keys {
                for column in FilterColumn::all() {
                    for mode in [ViewMode::Simple, ViewMode::Advanced] {
                        black_box(resolver.resolve(key, *column, mode));
                    }
                }
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_selection_toggle,
    bench_selection_rollup,
    bench_query_resolve
);
criterion_main!(benches);

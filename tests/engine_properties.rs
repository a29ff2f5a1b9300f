// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end properties of the taxonomy/selection engine, exercised through
//! the public crate surface the way the TUI uses it.

use myotome::diagram::{
    demo_document, AssetCatalog, BindingPhase, BodyAsset, DiagramBinding,
};
use myotome::model::{
    BodySide, GroupStatus, MuscleKey, SelectionState, TaxonomyRegistry, Tier, ViewMode,
};
use myotome::query::{FilterColumn, FilterQueryResolver};
use myotome::vocab::Vocabulary;

fn key(value: &str) -> MuscleKey {
    MuscleKey::new(value).expect("muscle key")
}

fn demo_asset(side: BodySide) -> BodyAsset {
    BodyAsset::parse(demo_document(side)).expect("demo parses")
}

fn detached_binding(mode: ViewMode) -> DiagramBinding<'static> {
    DiagramBinding::detached(
        TaxonomyRegistry::builtin(),
        Vocabulary::builtin(),
        AssetCatalog::embedded(),
        mode,
    )
}

#[test]
fn hierarchy_round_trips_in_both_directions() {
    let registry = TaxonomyRegistry::builtin();

    for advanced in registry.keys(Tier::Advanced) {
        let parent = registry
            .parent_of(advanced)
            .unwrap_or_else(|| panic!("{advanced} has no parent"));
        assert_eq!(registry.tier_of(parent), Some(Tier::Simple));
        assert!(registry.children_of(parent).contains(advanced));
    }

    for simple in registry.keys(Tier::Simple) {
        for child in registry.children_of(simple) {
            assert_eq!(registry.parent_of(child), Some(simple));
        }
    }
}

#[test]
fn double_toggle_from_empty_is_identity_for_every_group() {
    let registry = TaxonomyRegistry::builtin();

    for group in registry.keys(Tier::Simple) {
        let mut state = SelectionState::new();
        let before = state.snapshot();

        state.toggle(registry, group, ViewMode::Simple);
        assert_eq!(
            state.group_status(registry, group),
            GroupStatus::Full,
            "first toggle of {group} selects all children"
        );

        state.toggle(registry, group, ViewMode::Simple);
        assert_eq!(
            state.snapshot(),
            before,
            "second toggle of {group} restores the initial state"
        );
    }
}

#[test]
fn rollup_status_tracks_child_counts() {
    let registry = TaxonomyRegistry::builtin();
    let mut state = SelectionState::new();
    let chest = key("chest");

    assert_eq!(state.group_status(registry, &chest), GroupStatus::Empty);

    state.toggle_muscle(&key("upper-pectoralis"));
    assert_eq!(state.group_status(registry, &chest), GroupStatus::Partial);

    state.toggle_muscle(&key("mid-pectoralis"));
    state.toggle_muscle(&key("lower-pectoralis"));
    assert_eq!(state.group_status(registry, &chest), GroupStatus::Full);
}

#[test]
fn view_mode_round_trip_never_touches_the_snapshot() {
    let mut binding = detached_binding(ViewMode::Advanced);
    let token = binding.switch_side(BodySide::Front);
    binding.complete_load(BodySide::Front, token, Ok(demo_asset(BodySide::Front)));

    binding.toggle_legend_key(&key("long-head-bicep"));
    let snapshot = binding.snapshot();
    assert_eq!(snapshot, vec![key("long-head-bicep")]);

    binding.set_mode(ViewMode::Simple);
    assert_eq!(binding.snapshot(), snapshot);

    binding.set_mode(ViewMode::Advanced);
    assert_eq!(binding.snapshot(), snapshot);
}

#[test]
fn simple_coarse_filter_matches_the_full_reverse_mapped_set() {
    let resolver = FilterQueryResolver::builtin();

    let query = resolver.resolve(&key("biceps"), FilterColumn::Primary, ViewMode::Simple);
    assert_eq!(query.column, FilterColumn::Primary);
    assert_eq!(query.match_values, vec!["Biceps".to_owned()]);

    let query = resolver.resolve(&key("chest"), FilterColumn::Primary, ViewMode::Simple);
    assert_eq!(
        query.match_values,
        vec!["Chest".to_owned(), "Pecs".to_owned()]
    );
}

#[test]
fn advanced_isolated_filter_is_a_singleton_of_that_key() {
    let resolver = FilterQueryResolver::builtin();
    let vocab = Vocabulary::builtin();

    let query = resolver.resolve(
        &key("long-head-bicep"),
        FilterColumn::Isolated,
        ViewMode::Advanced,
    );
    assert_eq!(
        query.match_values,
        vec![vocab.to_backend_name(&key("long-head-bicep"))]
    );
    // The key's own backend name, never the parent group's.
    assert_ne!(query.match_values, vec!["Biceps".to_owned()]);
}

#[test]
fn resolved_match_values_are_never_empty() {
    let resolver = FilterQueryResolver::builtin();
    let registry = TaxonomyRegistry::builtin();

    let mut keys: Vec<MuscleKey> = registry.keys(Tier::Simple).cloned().collect();
    keys.extend(registry.keys(Tier::Advanced).cloned());
    keys.push(key("completely-unknown"));

    for candidate in keys {
        for column in FilterColumn::all() {
            for mode in [ViewMode::Simple, ViewMode::Advanced] {
                let query = resolver.resolve(&candidate, *column, mode);
                assert!(
                    !query.match_values.is_empty(),
                    "{candidate} on {column} in {mode} mode resolved to nothing"
                );
            }
        }
    }
}

#[test]
fn vendor_region_translation_is_deterministic_over_the_table() {
    let vocab = Vocabulary::builtin();

    for slug in vocab.region_slugs() {
        let first = vocab.from_vendor_region(slug);
        for _ in 0..3 {
            assert_eq!(vocab.from_vendor_region(slug), first);
        }
    }
}

#[test]
fn rapid_side_switches_leave_the_last_requested_side_on_screen() {
    // Back then immediately front; the back fetch resolves last.
    let mut binding = detached_binding(ViewMode::Simple);
    let rear_token = binding.switch_side(BodySide::Rear);
    let front_token = binding.switch_side(BodySide::Front);

    binding.complete_load(BodySide::Front, front_token, Ok(demo_asset(BodySide::Front)));
    binding.complete_load(BodySide::Rear, rear_token, Ok(demo_asset(BodySide::Rear)));

    match binding.phase() {
        BindingPhase::Ready { view } => assert_eq!(view.side(), BodySide::Front),
        other => panic!("expected front view, got {other:?}"),
    }

    // Same race, other completion order.
    let mut binding = detached_binding(ViewMode::Simple);
    let rear_token = binding.switch_side(BodySide::Rear);
    let front_token = binding.switch_side(BodySide::Front);

    binding.complete_load(BodySide::Rear, rear_token, Ok(demo_asset(BodySide::Rear)));
    binding.complete_load(BodySide::Front, front_token, Ok(demo_asset(BodySide::Front)));

    match binding.phase() {
        BindingPhase::Ready { view } => assert_eq!(view.side(), BodySide::Front),
        other => panic!("expected front view, got {other:?}"),
    }
}

#[test]
fn diagram_clicks_and_legend_clicks_are_the_same_toggle() {
    let mut via_region = detached_binding(ViewMode::Simple);
    let token = via_region.switch_side(BodySide::Front);
    via_region.complete_load(BodySide::Front, token, Ok(demo_asset(BodySide::Front)));

    let mut via_legend = detached_binding(ViewMode::Simple);
    let token = via_legend.switch_side(BodySide::Front);
    via_legend.complete_load(BodySide::Front, token, Ok(demo_asset(BodySide::Front)));

    // Region click carries the region's advanced key; legend click carries
    // the simple group. In simple mode both must produce the same set.
    via_region.toggle_region_key(&key("long-head-bicep"));
    via_legend.toggle_legend_key(&key("biceps"));

    assert_eq!(via_region.snapshot(), via_legend.snapshot());
    assert!(!via_region.snapshot().is_empty());
}

#[test]
fn loader_thread_completes_embedded_loads() {
    // A real (non-detached) binding against the embedded documents: the
    // worker thread must deliver a ready front view through poll().
    let mut binding = DiagramBinding::new(
        TaxonomyRegistry::builtin(),
        Vocabulary::builtin(),
        AssetCatalog::embedded(),
        ViewMode::Simple,
    );
    binding.switch_side(BodySide::Front);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
        binding.poll();
        match binding.phase() {
            BindingPhase::Ready { view } => {
                assert_eq!(view.side(), BodySide::Front);
                break;
            }
            _ if std::time::Instant::now() > deadline => {
                panic!("loader did not complete in time: {:?}", binding.phase());
            }
            _ => std::thread::sleep(std::time::Duration::from_millis(5)),
        }
    }
}

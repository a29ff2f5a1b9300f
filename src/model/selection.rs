// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::keys::MuscleKey;
use super::taxonomy::{BodySide, TaxonomyRegistry, Tier};
use super::view_mode::ViewMode;

/// Rollup status of a simple group over its children's selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    Empty,
    Partial,
    Full,
}

/// The rollup children whose visual state may have changed after a mutation.
///
/// Renderers redraw exactly these key groups; a bilateral key appears once
/// even when it backs several diagram regions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionDelta {
    pub changed: Vec<MuscleKey>,
}

impl SelectionDelta {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }
}

/// The set of chosen muscles for one interactive widget instance.
///
/// Selection is always stored at the most granular tier (advanced keys, plus
/// childless simple keys standing in as their own subdivision). View mode
/// only changes how this set is displayed and grouped, never its contents.
/// Created empty with a selector, discarded with it; callers that need
/// persistence serialize [`SelectionState::snapshot`] themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    selected: BTreeSet<MuscleKey>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, key: &MuscleKey) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Flips membership of exactly one granular key.
    pub fn toggle_muscle(&mut self, key: &MuscleKey) -> SelectionDelta {
        if !self.selected.remove(key) {
            self.selected.insert(key.clone());
        }
        SelectionDelta {
            changed: vec![key.clone()],
        }
    }

    /// All-or-nothing group toggle, the documented simple-mode behavior:
    /// every child is set to the same new value, "select all" unless every
    /// child is already selected (then "deselect all"). A partial group
    /// therefore toggles to full, not to empty.
    pub fn toggle_group(
        &mut self,
        registry: &TaxonomyRegistry,
        group: &MuscleKey,
    ) -> SelectionDelta {
        let children = registry.children_of(group);
        if children.is_empty() {
            return SelectionDelta::default();
        }

        let select = !children.iter().all(|child| self.selected.contains(child));
        let mut changed = Vec::new();
        for child in children {
            let flipped = if select {
                self.selected.insert(child.clone())
            } else {
                self.selected.remove(child)
            };
            if flipped {
                changed.push(child.clone());
            }
        }
        SelectionDelta { changed }
    }

    /// Dispatches on the display mode: in simple mode the key names a group
    /// and toggles all of it; in advanced mode it names one muscle.
    pub fn toggle(
        &mut self,
        registry: &TaxonomyRegistry,
        key: &MuscleKey,
        mode: ViewMode,
    ) -> SelectionDelta {
        match mode {
            ViewMode::Simple => self.toggle_group(registry, key),
            ViewMode::Advanced => self.toggle_muscle(key),
        }
    }

    /// Rollup over a simple group's children. Full iff all are selected,
    /// empty iff none; a single-child group is never partial.
    pub fn group_status(&self, registry: &TaxonomyRegistry, group: &MuscleKey) -> GroupStatus {
        let children = registry.children_of(group);
        if children.is_empty() {
            return GroupStatus::Empty;
        }

        let selected = children
            .iter()
            .filter(|child| self.selected.contains(*child))
            .count();
        if selected == 0 {
            GroupStatus::Empty
        } else if selected == children.len() {
            GroupStatus::Full
        } else {
            GroupStatus::Partial
        }
    }

    /// Status of a single key as shown on the diagram: resolved through its
    /// simple parent when the mode is simple, direct membership otherwise.
    pub fn display_status(
        &self,
        registry: &TaxonomyRegistry,
        key: &MuscleKey,
        mode: ViewMode,
    ) -> GroupStatus {
        match mode {
            ViewMode::Simple => match registry.parent_of(key) {
                Some(parent) => self.group_status(registry, parent),
                None => GroupStatus::Empty,
            },
            ViewMode::Advanced => {
                if self.selected.contains(key) {
                    GroupStatus::Full
                } else {
                    GroupStatus::Empty
                }
            }
        }
    }

    /// Selects every granular key on the active body side.
    pub fn select_all(&mut self, registry: &TaxonomyRegistry, side: BodySide) -> SelectionDelta {
        let mut changed = Vec::new();
        for key in registry.rollup_keys_on_side(side) {
            if self.selected.insert(key.clone()) {
                changed.push(key);
            }
        }
        SelectionDelta { changed }
    }

    /// Deselects every granular key on the active body side.
    pub fn clear(&mut self, registry: &TaxonomyRegistry, side: BodySide) -> SelectionDelta {
        let mut changed = Vec::new();
        for key in registry.rollup_keys_on_side(side) {
            if self.selected.remove(&key) {
                changed.push(key);
            }
        }
        SelectionDelta { changed }
    }

    /// The selected granular keys, ordered, for persistence or submission.
    pub fn snapshot(&self) -> Vec<MuscleKey> {
        self.selected.iter().cloned().collect()
    }
}

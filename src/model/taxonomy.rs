// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use super::keys::MuscleKey;

/// The hierarchy level a canonical key lives at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Simple,
    Advanced,
}

/// Which body view a muscle is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodySide {
    Front,
    Rear,
}

impl BodySide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Rear => "rear",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Rear,
            Self::Rear => Self::Front,
        }
    }
}

impl fmt::Display for BodySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata for one canonical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyEntry {
    label: String,
    side: BodySide,
    tier: Tier,
}

impl TaxonomyEntry {
    pub fn new(label: impl Into<String>, side: BodySide, tier: Tier) -> Self {
        Self {
            label: label.into(),
            side,
            tier,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn side(&self) -> BodySide {
        self.side
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    DuplicateEntry {
        key: MuscleKey,
    },
    UnknownEdgeParent {
        parent: MuscleKey,
    },
    UnknownEdgeChild {
        child: MuscleKey,
    },
    EdgeParentNotSimple {
        parent: MuscleKey,
    },
    EdgeChildNotAdvanced {
        child: MuscleKey,
    },
    /// An advanced key claimed two parents. The hierarchy must be a forest;
    /// this indicates a corrupt build-time table and aborts construction.
    DuplicateParent {
        child: MuscleKey,
        first: MuscleKey,
        second: MuscleKey,
    },
}

impl fmt::Display for TaxonomyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEntry { key } => write!(f, "duplicate taxonomy entry for {key}"),
            Self::UnknownEdgeParent { parent } => {
                write!(f, "hierarchy edge references unknown parent {parent}")
            }
            Self::UnknownEdgeChild { child } => {
                write!(f, "hierarchy edge references unknown child {child}")
            }
            Self::EdgeParentNotSimple { parent } => {
                write!(f, "hierarchy edge parent {parent} is not a simple key")
            }
            Self::EdgeChildNotAdvanced { child } => {
                write!(f, "hierarchy edge child {child} is not an advanced key")
            }
            Self::DuplicateParent {
                child,
                first,
                second,
            } => write!(
                f,
                "advanced key {child} is mapped to two parents ({first} and {second})"
            ),
        }
    }
}

impl std::error::Error for TaxonomyError {}

/// The immutable two-tier muscle classification.
///
/// Built once from declared entries and hierarchy edges; the reverse index
/// (child → parent) is derived in the same pass as the forward index so the
/// two can never disagree. A simple key with no declared subdivision is its
/// own sole rollup child, so selection and status code never special-cases
/// childless groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyRegistry {
    entries: BTreeMap<MuscleKey, TaxonomyEntry>,
    children: BTreeMap<MuscleKey, Vec<MuscleKey>>,
    parents: BTreeMap<MuscleKey, MuscleKey>,
    simple_order: Vec<MuscleKey>,
    advanced_order: Vec<MuscleKey>,
}

impl TaxonomyRegistry {
    /// Builds the registry from entry and edge tables.
    ///
    /// Runs in O(entries + edges). Any advanced key mapped to more than one
    /// parent is rejected here, at construction, never at lookup time.
    pub fn from_tables(
        entries: Vec<(MuscleKey, TaxonomyEntry)>,
        edges: Vec<(MuscleKey, MuscleKey)>,
    ) -> Result<Self, TaxonomyError> {
        let mut entry_map = BTreeMap::new();
        let mut simple_order = Vec::new();
        let mut advanced_order = Vec::new();

        for (key, entry) in entries {
            match entry.tier() {
                Tier::Simple => simple_order.push(key.clone()),
                Tier::Advanced => advanced_order.push(key.clone()),
            }
            if entry_map.insert(key.clone(), entry).is_some() {
                return Err(TaxonomyError::DuplicateEntry { key });
            }
        }

        let mut children: BTreeMap<MuscleKey, Vec<MuscleKey>> = BTreeMap::new();
        let mut parents: BTreeMap<MuscleKey, MuscleKey> = BTreeMap::new();

        for (parent, child) in edges {
            match entry_map.get(&parent).map(TaxonomyEntry::tier) {
                Some(Tier::Simple) => {}
                Some(Tier::Advanced) => {
                    return Err(TaxonomyError::EdgeParentNotSimple { parent });
                }
                None => return Err(TaxonomyError::UnknownEdgeParent { parent }),
            }
            match entry_map.get(&child).map(TaxonomyEntry::tier) {
                Some(Tier::Advanced) => {}
                Some(Tier::Simple) => {
                    return Err(TaxonomyError::EdgeChildNotAdvanced { child });
                }
                None => return Err(TaxonomyError::UnknownEdgeChild { child }),
            }

            if let Some(first) = parents.get(&child) {
                return Err(TaxonomyError::DuplicateParent {
                    child,
                    first: first.clone(),
                    second: parent,
                });
            }

            parents.insert(child.clone(), parent.clone());
            children.entry(parent).or_default().push(child);
        }

        // A simple key without subdivisions rolls up through itself.
        for simple in &simple_order {
            if !children.contains_key(simple) {
                children.insert(simple.clone(), vec![simple.clone()]);
                parents.insert(simple.clone(), simple.clone());
            }
        }

        Ok(Self {
            entries: entry_map,
            children,
            parents,
            simple_order,
            advanced_order,
        })
    }

    /// The embedded muscle table. An inconsistent builtin table is a
    /// programming error and aborts on first use rather than surfacing as
    /// per-interaction failures later.
    pub fn builtin() -> &'static TaxonomyRegistry {
        static REGISTRY: OnceLock<TaxonomyRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            builtin_tables().expect("builtin muscle taxonomy tables are consistent")
        })
    }

    pub fn entry(&self, key: &MuscleKey) -> Option<&TaxonomyEntry> {
        self.entries.get(key)
    }

    pub fn tier_of(&self, key: &MuscleKey) -> Option<Tier> {
        self.entries.get(key).map(TaxonomyEntry::tier)
    }

    pub fn side_of(&self, key: &MuscleKey) -> Option<BodySide> {
        self.entries.get(key).map(TaxonomyEntry::side)
    }

    /// Display label, falling back to a humanized form of the key for
    /// anything without an entry.
    pub fn label_of(&self, key: &MuscleKey) -> String {
        match self.entries.get(key) {
            Some(entry) => entry.label().to_owned(),
            None => key.humanize(),
        }
    }

    /// The simple parent of a rollup child. Defined for every advanced key
    /// and for childless simple keys (which parent to themselves).
    pub fn parent_of(&self, key: &MuscleKey) -> Option<&MuscleKey> {
        self.parents.get(key)
    }

    /// Ordered rollup children of a simple key: its declared advanced
    /// subdivisions, or a singleton of the key itself when it has none.
    /// Empty for keys that are not simple.
    pub fn children_of(&self, key: &MuscleKey) -> &[MuscleKey] {
        self.children.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All keys of one tier in declaration order.
    pub fn keys(&self, tier: Tier) -> impl Iterator<Item = &MuscleKey> {
        match tier {
            Tier::Simple => self.simple_order.iter(),
            Tier::Advanced => self.advanced_order.iter(),
        }
    }

    /// Keys of one tier whose own entry sits on `side`, in declaration order.
    pub fn keys_on_side(&self, tier: Tier, side: BodySide) -> Vec<&MuscleKey> {
        self.keys(tier)
            .filter(|key| self.side_of(key) == Some(side))
            .collect()
    }

    /// Every rollup child (the granularity selection is stored at) whose
    /// entry sits on `side`, grouped by simple declaration order.
    pub fn rollup_keys_on_side(&self, side: BodySide) -> Vec<MuscleKey> {
        let mut keys = Vec::new();
        for simple in &self.simple_order {
            for child in self.children_of(simple) {
                if self.side_of(child) == Some(side) {
                    keys.push(child.clone());
                }
            }
        }
        keys
    }
}

struct RawMuscle {
    key: &'static str,
    label: &'static str,
    /// Advanced entries usually sit on their group's side; the exceptions
    /// (e.g. the rear deltoid under the front-side shoulders group) carry
    /// their own.
    side: Option<BodySide>,
}

struct RawGroup {
    key: &'static str,
    label: &'static str,
    side: BodySide,
    muscles: &'static [RawMuscle],
}

const fn muscle(key: &'static str, label: &'static str) -> RawMuscle {
    RawMuscle {
        key,
        label,
        side: None,
    }
}

const fn muscle_on(key: &'static str, label: &'static str, side: BodySide) -> RawMuscle {
    RawMuscle {
        key,
        label,
        side: Some(side),
    }
}

const BUILTIN_GROUPS: &[RawGroup] = &[
    RawGroup {
        key: "chest",
        label: "Chest",
        side: BodySide::Front,
        muscles: &[
            muscle("upper-pectoralis", "Upper Pectoralis"),
            muscle("mid-pectoralis", "Mid Pectoralis"),
            muscle("lower-pectoralis", "Lower Pectoralis"),
        ],
    },
    RawGroup {
        key: "shoulders",
        label: "Shoulders",
        side: BodySide::Front,
        muscles: &[
            muscle("front-deltoid", "Front Deltoid"),
            muscle("side-deltoid", "Side Deltoid"),
            muscle_on("rear-deltoid", "Rear Deltoid", BodySide::Rear),
        ],
    },
    RawGroup {
        key: "biceps",
        label: "Biceps",
        side: BodySide::Front,
        muscles: &[
            muscle("long-head-bicep", "Biceps Long Head"),
            muscle("short-head-bicep", "Biceps Short Head"),
        ],
    },
    RawGroup {
        key: "forearms",
        label: "Forearms",
        side: BodySide::Front,
        muscles: &[
            muscle("wrist-flexors", "Wrist Flexors"),
            muscle_on("wrist-extensors", "Wrist Extensors", BodySide::Rear),
        ],
    },
    RawGroup {
        key: "core",
        label: "Core",
        side: BodySide::Front,
        muscles: &[
            muscle("upper-abdominals", "Upper Abdominals"),
            muscle("lower-abdominals", "Lower Abdominals"),
            muscle("obliques", "Obliques"),
        ],
    },
    RawGroup {
        key: "quads",
        label: "Quads",
        side: BodySide::Front,
        muscles: &[
            muscle("rectus-femoris", "Rectus Femoris"),
            muscle("vastus-lateralis", "Vastus Lateralis"),
            muscle("vastus-medialis", "Vastus Medialis"),
        ],
    },
    RawGroup {
        key: "neck",
        label: "Neck",
        side: BodySide::Front,
        muscles: &[],
    },
    RawGroup {
        key: "back",
        label: "Back",
        side: BodySide::Rear,
        muscles: &[
            muscle("upper-traps", "Upper Trapezius"),
            muscle("lats", "Latissimus Dorsi"),
            muscle("rhomboids", "Rhomboids"),
            muscle("lower-back", "Lower Back"),
        ],
    },
    RawGroup {
        key: "triceps",
        label: "Triceps",
        side: BodySide::Rear,
        muscles: &[
            muscle("long-head-tricep", "Triceps Long Head"),
            muscle("lateral-head-tricep", "Triceps Lateral Head"),
            muscle("medial-head-tricep", "Triceps Medial Head"),
        ],
    },
    RawGroup {
        key: "glutes",
        label: "Glutes",
        side: BodySide::Rear,
        muscles: &[
            muscle("gluteus-maximus", "Gluteus Maximus"),
            muscle("gluteus-medius", "Gluteus Medius"),
        ],
    },
    RawGroup {
        key: "hamstrings",
        label: "Hamstrings",
        side: BodySide::Rear,
        muscles: &[
            muscle("biceps-femoris", "Biceps Femoris"),
            muscle("semitendinosus", "Semitendinosus"),
        ],
    },
    RawGroup {
        key: "calves",
        label: "Calves",
        side: BodySide::Rear,
        muscles: &[
            muscle("gastrocnemius", "Gastrocnemius"),
            muscle("soleus", "Soleus"),
        ],
    },
];

fn builtin_tables() -> Result<TaxonomyRegistry, Box<dyn std::error::Error>> {
    let mut entries = Vec::new();
    let mut edges = Vec::new();

    for group in BUILTIN_GROUPS {
        let group_key = MuscleKey::new(group.key)?;
        entries.push((
            group_key.clone(),
            TaxonomyEntry::new(group.label, group.side, Tier::Simple),
        ));
        for raw in group.muscles {
            let child_key = MuscleKey::new(raw.key)?;
            let side = raw.side.unwrap_or(group.side);
            entries.push((
                child_key.clone(),
                TaxonomyEntry::new(raw.label, side, Tier::Advanced),
            ));
            edges.push((group_key.clone(), child_key));
        }
    }

    Ok(TaxonomyRegistry::from_tables(entries, edges)?)
}

#[cfg(test)]
mod tests {
    use super::{BodySide, TaxonomyEntry, TaxonomyError, TaxonomyRegistry, Tier};
    use crate::model::keys::MuscleKey;

    fn key(value: &str) -> MuscleKey {
        MuscleKey::new(value).expect("muscle key")
    }

    #[test]
    fn builtin_hierarchy_round_trips() {
        let registry = TaxonomyRegistry::builtin();

        for advanced in registry.keys(Tier::Advanced) {
            let parent = registry.parent_of(advanced).expect("parent defined");
            assert_eq!(registry.tier_of(parent), Some(Tier::Simple));
            assert!(
                registry.children_of(parent).contains(advanced),
                "{advanced} missing from children of {parent}"
            );
        }

        for simple in registry.keys(Tier::Simple) {
            for child in registry.children_of(simple) {
                assert_eq!(registry.parent_of(child), Some(simple));
            }
        }
    }

    #[test]
    fn childless_simple_key_is_its_own_rollup_child() {
        let registry = TaxonomyRegistry::builtin();
        let neck = key("neck");

        assert_eq!(registry.children_of(&neck), &[neck.clone()]);
        assert_eq!(registry.parent_of(&neck), Some(&neck));
        assert_eq!(registry.tier_of(&neck), Some(Tier::Simple));
    }

    #[test]
    fn label_falls_back_to_humanized_key() {
        let registry = TaxonomyRegistry::builtin();

        assert_eq!(registry.label_of(&key("lats")), "Latissimus Dorsi");
        assert_eq!(registry.label_of(&key("mystery-muscle")), "Mystery Muscle");
    }

    #[test]
    fn advanced_side_can_differ_from_group_side() {
        let registry = TaxonomyRegistry::builtin();

        assert_eq!(registry.side_of(&key("shoulders")), Some(BodySide::Front));
        assert_eq!(registry.side_of(&key("rear-deltoid")), Some(BodySide::Rear));
        assert_eq!(
            registry.parent_of(&key("rear-deltoid")),
            Some(&key("shoulders"))
        );
    }

    #[test]
    fn duplicate_parent_is_rejected_at_construction() {
        let entries = vec![
            (
                key("chest"),
                TaxonomyEntry::new("Chest", BodySide::Front, Tier::Simple),
            ),
            (
                key("back"),
                TaxonomyEntry::new("Back", BodySide::Rear, Tier::Simple),
            ),
            (
                key("mystery"),
                TaxonomyEntry::new("Mystery", BodySide::Front, Tier::Advanced),
            ),
        ];
        let edges = vec![
            (key("chest"), key("mystery")),
            (key("back"), key("mystery")),
        ];

        let result = TaxonomyRegistry::from_tables(entries, edges);
        assert_eq!(
            result,
            Err(TaxonomyError::DuplicateParent {
                child: key("mystery"),
                first: key("chest"),
                second: key("back"),
            })
        );
    }

    #[test]
    fn edges_between_wrong_tiers_are_rejected() {
        let entries = vec![
            (
                key("chest"),
                TaxonomyEntry::new("Chest", BodySide::Front, Tier::Simple),
            ),
            (
                key("biceps"),
                TaxonomyEntry::new("Biceps", BodySide::Front, Tier::Simple),
            ),
        ];
        let edges = vec![(key("chest"), key("biceps"))];

        assert_eq!(
            TaxonomyRegistry::from_tables(entries, edges),
            Err(TaxonomyError::EdgeChildNotAdvanced { child: key("biceps") })
        );
    }

    #[test]
    fn rollup_keys_follow_entry_side_not_group_side() {
        let registry = TaxonomyRegistry::builtin();

        let front = registry.rollup_keys_on_side(BodySide::Front);
        let rear = registry.rollup_keys_on_side(BodySide::Rear);

        assert!(front.contains(&key("front-deltoid")));
        assert!(!front.contains(&key("rear-deltoid")));
        assert!(rear.contains(&key("rear-deltoid")));
        assert!(front.contains(&key("neck")));
        assert!(rear.contains(&key("gastrocnemius")));
    }
}

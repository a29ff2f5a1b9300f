// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Translation between external vocabularies and canonical keys.
//!
//! Three vocabularies meet here: vendor region slugs from body-map documents,
//! raw classification strings from persisted workout records, and the backend
//! names the query layer expects. Forward tables are declared; every reverse
//! index is derived in the same construction step so an edit to one table can
//! never leave a derived map stale.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::model::{MuscleKey, RegionSlug, TaxonomyRegistry};

/// Which classification column family a persisted string came from.
///
/// Coarse columns (primary/secondary/tertiary) store simple-group strings;
/// the fine column stores backend muscle names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFamily {
    Coarse,
    Fine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    UnknownKey {
        key: MuscleKey,
        table: &'static str,
    },
    DuplicateRaw {
        value: String,
    },
    DuplicateRegion {
        slug: RegionSlug,
    },
    /// Two canonical keys with different parents share a backend name; the
    /// grouped-name exception only covers siblings collapsing into one bucket.
    AmbiguousBackendName {
        name: String,
        first: MuscleKey,
        second: MuscleKey,
    },
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey { key, table } => {
                write!(f, "{table} table references key {key} with no taxonomy entry")
            }
            Self::DuplicateRaw { value } => {
                write!(f, "persisted value {value:?} is mapped twice")
            }
            Self::DuplicateRegion { slug } => {
                write!(f, "vendor region {slug} is mapped twice")
            }
            Self::AmbiguousBackendName { name, first, second } => write!(
                f,
                "backend name {name:?} is shared by {first} and {second}, which are not siblings"
            ),
        }
    }
}

impl std::error::Error for VocabularyError {}

/// The immutable translation tables plus their derived reverse indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    regions: BTreeMap<RegionSlug, Option<MuscleKey>>,
    coarse_in: BTreeMap<String, MuscleKey>,
    fine_in: BTreeMap<String, MuscleKey>,
    backend_names: BTreeMap<MuscleKey, String>,
    coarse_out: BTreeMap<MuscleKey, Vec<String>>,
}

impl Vocabulary {
    pub fn from_tables(
        registry: &TaxonomyRegistry,
        region_table: Vec<(RegionSlug, Option<MuscleKey>)>,
        coarse_table: Vec<(String, MuscleKey)>,
        backend_table: Vec<(MuscleKey, String)>,
    ) -> Result<Self, VocabularyError> {
        let mut regions = BTreeMap::new();
        for (slug, key) in region_table {
            if let Some(key) = &key {
                if registry.entry(key).is_none() {
                    return Err(VocabularyError::UnknownKey {
                        key: key.clone(),
                        table: "region",
                    });
                }
            }
            if regions.insert(slug.clone(), key).is_some() {
                return Err(VocabularyError::DuplicateRegion { slug });
            }
        }

        let mut coarse_in = BTreeMap::new();
        let mut coarse_out: BTreeMap<MuscleKey, Vec<String>> = BTreeMap::new();
        for (raw, key) in coarse_table {
            if registry.entry(&key).is_none() {
                return Err(VocabularyError::UnknownKey {
                    key,
                    table: "coarse",
                });
            }
            if coarse_in.insert(raw.clone(), key.clone()).is_some() {
                return Err(VocabularyError::DuplicateRaw { value: raw });
            }
            coarse_out.entry(key).or_default().push(raw);
        }

        let mut backend_names = BTreeMap::new();
        let mut fine_in: BTreeMap<String, MuscleKey> = BTreeMap::new();
        for (key, name) in backend_table {
            if registry.entry(&key).is_none() {
                return Err(VocabularyError::UnknownKey {
                    key,
                    table: "backend",
                });
            }
            match fine_in.get(&name).cloned() {
                None => {
                    fine_in.insert(name.clone(), key.clone());
                }
                Some(existing) => {
                    // Several sibling keys may collapse into one backend
                    // bucket; the shared name then reads back as the parent.
                    let existing_parent = registry
                        .parent_of(&existing)
                        .cloned()
                        .unwrap_or_else(|| existing.clone());
                    let key_parent = registry
                        .parent_of(&key)
                        .cloned()
                        .unwrap_or_else(|| key.clone());
                    if existing_parent == key_parent {
                        fine_in.insert(name.clone(), existing_parent);
                    } else {
                        return Err(VocabularyError::AmbiguousBackendName {
                            name,
                            first: existing,
                            second: key,
                        });
                    }
                }
            }
            backend_names.insert(key, name);
        }

        Ok(Self {
            regions,
            coarse_in,
            fine_in,
            backend_names,
            coarse_out,
        })
    }

    /// The embedded tables, validated against the builtin taxonomy once.
    pub fn builtin() -> &'static Vocabulary {
        static VOCABULARY: OnceLock<Vocabulary> = OnceLock::new();
        VOCABULARY.get_or_init(|| {
            builtin_tables(TaxonomyRegistry::builtin())
                .expect("builtin vocabulary tables are consistent")
        })
    }

    /// Canonical key for a vendor region, or `None` for intentionally
    /// non-interactive anatomy (head, joints) and for slugs the table has
    /// never heard of. Pure lookup: same slug, same answer, every call.
    pub fn from_vendor_region(&self, slug: &RegionSlug) -> Option<&MuscleKey> {
        self.regions.get(slug).and_then(Option::as_ref)
    }

    /// Canonical key for a raw persisted classification string, or `None`
    /// when no mapping exists. Callers then use the raw string unchanged,
    /// so upstream data additions never hard-fail the UI.
    pub fn from_persisted_value(&self, raw: &str, family: ColumnFamily) -> Option<&MuscleKey> {
        match family {
            ColumnFamily::Coarse => self.coarse_in.get(raw),
            ColumnFamily::Fine => self.fine_in.get(raw),
        }
    }

    /// Canonical key string or the raw value verbatim (the fail-open form
    /// of [`Vocabulary::from_persisted_value`]).
    pub fn canonicalize(&self, raw: &str, family: ColumnFamily) -> String {
        match self.from_persisted_value(raw, family) {
            Some(key) => key.as_str().to_owned(),
            None => raw.to_owned(),
        }
    }

    /// Backend query name for a canonical key. Unmapped keys pass through
    /// verbatim rather than failing closed.
    pub fn to_backend_name(&self, key: &MuscleKey) -> String {
        match self.backend_names.get(key) {
            Some(name) => name.clone(),
            None => key.as_str().to_owned(),
        }
    }

    /// Every raw persisted coarse string known to collapse onto `key`, in
    /// declaration order. Derived once at construction from the forward
    /// table. Empty for keys no coarse value maps to.
    pub fn raw_values_for(&self, key: &MuscleKey) -> &[String] {
        self.coarse_out.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All declared vendor slugs, for translation-totality checks.
    pub fn region_slugs(&self) -> impl Iterator<Item = &RegionSlug> {
        self.regions.keys()
    }
}

const COARSE_TABLE: &[(&str, &str)] = &[
    ("Chest", "chest"),
    ("Pecs", "chest"),
    ("Shoulders", "shoulders"),
    ("Delts", "shoulders"),
    ("Biceps", "biceps"),
    ("Forearms", "forearms"),
    ("Abs", "core"),
    ("Core", "core"),
    ("Quads", "quads"),
    ("Quadriceps", "quads"),
    ("Neck", "neck"),
    ("Back", "back"),
    ("Upper Back", "back"),
    ("Triceps", "triceps"),
    ("Glutes", "glutes"),
    ("Hamstrings", "hamstrings"),
    ("Hams", "hamstrings"),
    ("Calves", "calves"),
];

const BACKEND_TABLE: &[(&str, &str)] = &[
    ("upper-pectoralis", "Upper Chest"),
    ("mid-pectoralis", "Mid Chest"),
    ("lower-pectoralis", "Lower Chest"),
    ("front-deltoid", "Front Delts"),
    ("side-deltoid", "Side Delts"),
    ("rear-deltoid", "Rear Delts"),
    ("long-head-bicep", "Biceps Long Head"),
    ("short-head-bicep", "Biceps Short Head"),
    ("wrist-flexors", "Wrist Flexors"),
    ("wrist-extensors", "Wrist Extensors"),
    ("upper-abdominals", "Upper Abs"),
    ("lower-abdominals", "Lower Abs"),
    ("obliques", "Obliques"),
    ("rectus-femoris", "Rectus Femoris"),
    ("vastus-lateralis", "Vastus Lateralis"),
    ("vastus-medialis", "Vastus Medialis"),
    ("neck", "Neck"),
    ("upper-traps", "Traps"),
    ("lats", "Lats"),
    ("rhomboids", "Rhomboids"),
    ("lower-back", "Lower Back"),
    // The three triceps heads intentionally collapse into one backend
    // bucket; reading "Triceps" back yields the parent group.
    ("long-head-tricep", "Triceps"),
    ("lateral-head-tricep", "Triceps"),
    ("medial-head-tricep", "Triceps"),
    ("gluteus-maximus", "Glute Max"),
    ("gluteus-medius", "Glute Med"),
    ("biceps-femoris", "Biceps Femoris"),
    ("semitendinosus", "Semitendinosus"),
    ("gastrocnemius", "Gastrocnemius"),
    ("soleus", "Soleus"),
];

const REGION_TABLE: &[(&str, Option<&str>)] = &[
    // Front view.
    ("chest-upper-left", Some("upper-pectoralis")),
    ("chest-upper-right", Some("upper-pectoralis")),
    ("chest-mid-left", Some("mid-pectoralis")),
    ("chest-mid-right", Some("mid-pectoralis")),
    ("chest-lower-left", Some("lower-pectoralis")),
    ("chest-lower-right", Some("lower-pectoralis")),
    ("deltoid-front-left", Some("front-deltoid")),
    ("deltoid-front-right", Some("front-deltoid")),
    ("deltoid-side-left", Some("side-deltoid")),
    ("deltoid-side-right", Some("side-deltoid")),
    ("bicep-outer-left", Some("long-head-bicep")),
    ("bicep-outer-right", Some("long-head-bicep")),
    ("bicep-inner-left", Some("short-head-bicep")),
    ("bicep-inner-right", Some("short-head-bicep")),
    ("forearm-front-left", Some("wrist-flexors")),
    ("forearm-front-right", Some("wrist-flexors")),
    ("abs-upper", Some("upper-abdominals")),
    ("abs-lower", Some("lower-abdominals")),
    ("oblique-left", Some("obliques")),
    ("oblique-right", Some("obliques")),
    ("quad-mid-left", Some("rectus-femoris")),
    ("quad-mid-right", Some("rectus-femoris")),
    ("quad-outer-left", Some("vastus-lateralis")),
    ("quad-outer-right", Some("vastus-lateralis")),
    ("quad-inner-left", Some("vastus-medialis")),
    ("quad-inner-right", Some("vastus-medialis")),
    ("neck-left", Some("neck")),
    ("neck-right", Some("neck")),
    ("head", None),
    ("hands", None),
    ("hip", None),
    ("knee-left", None),
    ("knee-right", None),
    ("feet", None),
    // Rear view.
    ("traps", Some("upper-traps")),
    ("deltoid-rear-left", Some("rear-deltoid")),
    ("deltoid-rear-right", Some("rear-deltoid")),
    ("lat-left", Some("lats")),
    ("lat-right", Some("lats")),
    ("rhomboid-left", Some("rhomboids")),
    ("rhomboid-right", Some("rhomboids")),
    ("lower-back", Some("lower-back")),
    ("tricep-long-left", Some("long-head-tricep")),
    ("tricep-long-right", Some("long-head-tricep")),
    ("tricep-lateral-left", Some("lateral-head-tricep")),
    ("tricep-lateral-right", Some("lateral-head-tricep")),
    ("tricep-medial-left", Some("medial-head-tricep")),
    ("tricep-medial-right", Some("medial-head-tricep")),
    ("forearm-back-left", Some("wrist-extensors")),
    ("forearm-back-right", Some("wrist-extensors")),
    ("glute-upper-left", Some("gluteus-medius")),
    ("glute-upper-right", Some("gluteus-medius")),
    ("glute-left", Some("gluteus-maximus")),
    ("glute-right", Some("gluteus-maximus")),
    ("hamstring-outer-left", Some("biceps-femoris")),
    ("hamstring-outer-right", Some("biceps-femoris")),
    ("hamstring-inner-left", Some("semitendinosus")),
    ("hamstring-inner-right", Some("semitendinosus")),
    ("calf-left", Some("gastrocnemius")),
    ("calf-right", Some("gastrocnemius")),
    ("calf-lower-left", Some("soleus")),
    ("calf-lower-right", Some("soleus")),
    ("head-back", None),
    ("elbow-left", None),
    ("elbow-right", None),
    ("heel-left", None),
    ("heel-right", None),
];

fn builtin_tables(
    registry: &TaxonomyRegistry,
) -> Result<Vocabulary, Box<dyn std::error::Error>> {
    let mut region_table = Vec::with_capacity(REGION_TABLE.len());
    for (slug, key) in REGION_TABLE {
        let slug = RegionSlug::new(*slug)?;
        let key = key.map(MuscleKey::new).transpose()?;
        region_table.push((slug, key));
    }

    let mut coarse_table = Vec::with_capacity(COARSE_TABLE.len());
    for (raw, key) in COARSE_TABLE {
        coarse_table.push(((*raw).to_owned(), MuscleKey::new(*key)?));
    }

    let mut backend_table = Vec::with_capacity(BACKEND_TABLE.len());
    for (key, name) in BACKEND_TABLE {
        backend_table.push((MuscleKey::new(*key)?, (*name).to_owned()));
    }

    Ok(Vocabulary::from_tables(
        registry,
        region_table,
        coarse_table,
        backend_table,
    )?)
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only resolution of filter choices into query predicates.
//!
//! Given a user-facing filter key (simple or advanced depending on the view
//! mode) and a target classification column, this produces the exact set of
//! persisted values the external query layer should match against.

use std::fmt;

use crate::model::{MuscleKey, TaxonomyRegistry, ViewMode};
use crate::vocab::{ColumnFamily, Vocabulary};

/// The closed set of classification columns on persisted workout records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    Primary,
    Secondary,
    Tertiary,
    Isolated,
}

impl FilterColumn {
    pub fn all() -> &'static [FilterColumn] {
        &[
            Self::Primary,
            Self::Secondary,
            Self::Tertiary,
            Self::Isolated,
        ]
    }

    pub fn column_name(self) -> &'static str {
        match self {
            Self::Primary => "primary_muscle_group",
            Self::Secondary => "secondary_muscle_group",
            Self::Tertiary => "tertiary_muscle_group",
            Self::Isolated => "advanced_isolated_muscles",
        }
    }

    pub fn family(self) -> ColumnFamily {
        match self {
            Self::Primary | Self::Secondary | Self::Tertiary => ColumnFamily::Coarse,
            Self::Isolated => ColumnFamily::Fine,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "primary_muscle_group" => Some(Self::Primary),
            "secondary_muscle_group" => Some(Self::Secondary),
            "tertiary_muscle_group" => Some(Self::Tertiary),
            "advanced_isolated_muscles" => Some(Self::Isolated),
            _ => None,
        }
    }
}

impl fmt::Display for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A resolved predicate: match `column` against any of `match_values`.
/// `match_values` is never empty; an unmappable key resolves to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub column: FilterColumn,
    pub match_values: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterQueryResolver<'a> {
    registry: &'a TaxonomyRegistry,
    vocab: &'a Vocabulary,
}

impl<'a> FilterQueryResolver<'a> {
    pub fn new(registry: &'a TaxonomyRegistry, vocab: &'a Vocabulary) -> Self {
        Self { registry, vocab }
    }

    pub fn builtin() -> FilterQueryResolver<'static> {
        FilterQueryResolver {
            registry: TaxonomyRegistry::builtin(),
            vocab: Vocabulary::builtin(),
        }
    }

    /// Resolves a filter choice into persisted match values.
    ///
    /// Coarse columns never store advanced-level granularity, so filtering an
    /// advanced key against them widens to the whole simple group. The fine
    /// column expands a simple key to its children's backend names. Keys with
    /// no known mapping resolve to themselves verbatim; failing open avoids
    /// silently returning zero rows for legitimately-unmapped future data.
    pub fn resolve(&self, key: &MuscleKey, column: FilterColumn, mode: ViewMode) -> FilterQuery {
        let match_values = match (mode, column.family()) {
            (ViewMode::Advanced, ColumnFamily::Fine) => vec![self.vocab.to_backend_name(key)],
            (ViewMode::Advanced, ColumnFamily::Coarse) => {
                let group = self.registry.parent_of(key).unwrap_or(key);
                self.coarse_values(group, key)
            }
            (ViewMode::Simple, ColumnFamily::Coarse) => self.coarse_values(key, key),
            (ViewMode::Simple, ColumnFamily::Fine) => {
                let mut values: Vec<String> = Vec::new();
                for child in self.registry.children_of(key) {
                    let name = self.vocab.to_backend_name(child);
                    if !values.contains(&name) {
                        values.push(name);
                    }
                }
                if values.is_empty() {
                    values.push(key.as_str().to_owned());
                }
                values
            }
        };

        FilterQuery {
            column,
            match_values,
        }
    }

    fn coarse_values(&self, group: &MuscleKey, fallback: &MuscleKey) -> Vec<String> {
        let raw = self.vocab.raw_values_for(group);
        if raw.is_empty() {
            vec![fallback.as_str().to_owned()]
        } else {
            raw.to_vec()
        }
    }
}

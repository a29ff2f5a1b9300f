// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: canonical keys, the two-tier taxonomy, selection state,
//! and the display mode.
//!
//! Everything here is pure and terminal-free; the TUI and render layers sit
//! on top of it.

pub mod keys;
pub mod selection;
pub mod taxonomy;
pub mod view_mode;

pub use keys::{Key, KeyError, MuscleKey, RegionSlug};
pub use selection::{GroupStatus, SelectionDelta, SelectionState};
pub use taxonomy::{BodySide, TaxonomyEntry, TaxonomyError, TaxonomyRegistry, Tier};
pub use view_mode::ViewMode;

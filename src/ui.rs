// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared view-mode coordination between the TUI shell and renderers.
//!
//! The controller owns the process-wide display mode, persists it through the
//! prefs store, and fans out change notifications to bound renderers.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::model::ViewMode;
use crate::store::{PrefsFile, StoreError};

type ModeListener = Box<dyn FnMut(ViewMode) + Send>;

/// Holds the simple/advanced display mode, persists changes, and notifies
/// listeners synchronously in registration order.
///
/// A panicking listener is isolated so the ones registered after it still
/// run; the panic is reported on stderr and otherwise swallowed (a broken
/// renderer must not take the mode toggle down with it).
pub struct ViewModeController {
    mode: ViewMode,
    prefs: Option<PrefsFile>,
    listeners: Vec<ModeListener>,
}

impl std::fmt::Debug for ViewModeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewModeController")
            .field("mode", &self.mode)
            .field("prefs", &self.prefs)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ViewModeController {
    /// Reads the persisted mode (defaulting to simple on absence or a
    /// corrupt value; never errors) and binds future writes to `prefs`.
    pub fn with_prefs(prefs: PrefsFile) -> Self {
        let mode = prefs.load_view_mode();
        Self {
            mode,
            prefs: Some(prefs),
            listeners: Vec::new(),
        }
    }

    /// An unpersisted controller, for widgets that opt out of the shared
    /// flag (and for tests).
    pub fn ephemeral(mode: ViewMode) -> Self {
        Self {
            mode,
            prefs: None,
            listeners: Vec::new(),
        }
    }

    pub fn get(&self) -> ViewMode {
        self.mode
    }

    pub fn subscribe(&mut self, listener: impl FnMut(ViewMode) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Applies and persists `mode`, then notifies every listener.
    ///
    /// The in-memory change and the notifications always happen; a failing
    /// prefs write is returned for the caller to surface (a toast) but never
    /// blocks the interface.
    pub fn set(&mut self, mode: ViewMode) -> Result<(), StoreError> {
        self.mode = mode;

        let persisted = match &self.prefs {
            Some(prefs) => prefs.save_view_mode(mode),
            None => Ok(()),
        };

        for listener in &mut self.listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener(mode)));
            if result.is_err() {
                eprintln!("myotome: view-mode listener panicked; continuing");
            }
        }

        persisted
    }

    /// Flips the mode and returns the new value.
    pub fn toggle(&mut self) -> (ViewMode, Result<(), StoreError>) {
        let next = self.mode.toggled();
        let persisted = self.set(next);
        (next, persisted)
    }
}

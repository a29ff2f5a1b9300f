// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for user preferences on disk.
//!
//! The store module reads/writes the small prefs document (currently just the
//! view-mode flag) shared by every widget instance in a process.

pub mod prefs_file;

pub use prefs_file::{PrefsFile, StoreError, PREFS_FILENAME};

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Binding between the taxonomy/selection engine and a two-sided body
//! diagram.
//!
//! Each widget instance owns one [`DiagramBinding`]: the current body view,
//! the selection it renders, and the loader plumbing for body-side switches.
//! Region → key translation happens once per load; a canonical key may back
//! several mirrored regions and all of them move together on hover and
//! selection. Side switches carry a monotonically increasing request token
//! and only the latest token may advance the state machine, so rapid
//! switching can never leave a stale side on screen.

pub mod asset;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;

use crate::model::{
    BodySide, GroupStatus, MuscleKey, SelectionDelta, SelectionState, TaxonomyRegistry, Tier,
    ViewMode,
};
use crate::vocab::Vocabulary;

pub use asset::{demo_document, AssetParseError, BodyAsset};

#[derive(Debug)]
pub enum AssetError {
    Io { path: PathBuf, source: io::Error },
    Parse { source: AssetParseError },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read body map {path:?}: {source}"),
            Self::Parse { source } => write!(f, "cannot parse body map: {source}"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source } => Some(source),
        }
    }
}

/// Where a side's body-map document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    File(PathBuf),
    Embedded,
}

/// Resolves a body side to its document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    dir: Option<PathBuf>,
}

impl AssetCatalog {
    /// The built-in demo documents.
    pub fn embedded() -> Self {
        Self { dir: None }
    }

    /// `<dir>/front.bodymap` and `<dir>/rear.bodymap`.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn source_for(&self, side: BodySide) -> AssetSource {
        match &self.dir {
            Some(dir) => AssetSource::File(dir.join(format!("{side}.bodymap"))),
            None => AssetSource::Embedded,
        }
    }
}

fn load_asset(side: BodySide, source: &AssetSource) -> Result<BodyAsset, AssetError> {
    let doc = match source {
        AssetSource::File(path) => fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?,
        AssetSource::Embedded => demo_document(side).to_owned(),
    };
    BodyAsset::parse(&doc).map_err(|source| AssetError::Parse { source })
}

struct LoadRequest {
    side: BodySide,
    token: u64,
    source: AssetSource,
}

struct LoadResult {
    side: BodySide,
    token: u64,
    result: Result<BodyAsset, AssetError>,
}

/// Background loader: one named worker thread, requests in, results out.
/// The binding drains results on its own schedule; nothing here touches
/// binding state directly.
struct AssetLoader {
    requests: mpsc::Sender<LoadRequest>,
    results: mpsc::Receiver<LoadResult>,
}

impl AssetLoader {
    fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LoadRequest>();
        let (result_tx, result_rx) = mpsc::channel::<LoadResult>();

        std::thread::Builder::new()
            .name("myotome-asset-load".to_owned())
            .spawn(move || {
                while let Ok(request) = request_rx.recv() {
                    let result = load_asset(request.side, &request.source);
                    let sent = result_tx.send(LoadResult {
                        side: request.side,
                        token: request.token,
                        result,
                    });
                    if sent.is_err() {
                        break;
                    }
                }
            })
            .expect("spawn asset loader thread");

        Self {
            requests: request_tx,
            results: result_rx,
        }
    }
}

/// One translated, render-ready body view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyView {
    side: BodySide,
    asset: BodyAsset,
    code_keys: BTreeMap<char, Option<MuscleKey>>,
    key_codes: BTreeMap<MuscleKey, Vec<char>>,
}

impl BodyView {
    /// Translates every region's vendor slug exactly once. Slugs with no
    /// canonical key become inert regions; the document is otherwise taken
    /// as-is.
    pub fn from_asset(side: BodySide, asset: BodyAsset, vocab: &Vocabulary) -> Self {
        let mut code_keys = BTreeMap::new();
        let mut key_codes: BTreeMap<MuscleKey, Vec<char>> = BTreeMap::new();

        for (code, slug) in asset.regions() {
            let key = vocab.from_vendor_region(slug).cloned();
            if let Some(key) = &key {
                key_codes.entry(key.clone()).or_default().push(*code);
            }
            code_keys.insert(*code, key);
        }

        Self {
            side,
            asset,
            code_keys,
            key_codes,
        }
    }

    pub fn side(&self) -> BodySide {
        self.side
    }

    pub fn asset(&self) -> &BodyAsset {
        &self.asset
    }

    /// Canonical key under a cell, if that cell belongs to an interactive
    /// region.
    pub fn key_at(&self, x: usize, y: usize) -> Option<&MuscleKey> {
        let code = self.asset.code_at(x, y)?;
        self.code_keys.get(&code)?.as_ref()
    }

    /// True for declared regions whose slug translates to nothing
    /// (head, joints): drawn muted, inert to input.
    pub fn is_inert(&self, code: char) -> bool {
        matches!(self.code_keys.get(&code), Some(None))
    }

    /// Canonical key behind a region code, if the region is interactive.
    pub fn key_for_code(&self, code: char) -> Option<&MuscleKey> {
        self.code_keys.get(&code)?.as_ref()
    }

    /// Every region code backing `key`: the whole bilateral group.
    pub fn codes_for(&self, key: &MuscleKey) -> &[char] {
        self.key_codes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Interactive keys present on this view, with their region codes.
    pub fn key_codes(&self) -> &BTreeMap<MuscleKey, Vec<char>> {
        &self.key_codes
    }
}

/// Lifecycle of one diagram widget.
#[derive(Debug, Clone)]
pub enum BindingPhase {
    Uninitialized,
    Loading {
        side: BodySide,
    },
    Ready {
        view: Arc<BodyView>,
    },
    /// The document failed to load or parse; rendered as an inline error
    /// inviting a reload.
    Failed {
        side: BodySide,
        message: String,
    },
}

/// One legend row: a key in the current mode's tier plus its tri-state
/// rollup status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub key: MuscleKey,
    pub label: String,
    pub status: GroupStatus,
}

pub struct DiagramBinding<'a> {
    registry: &'a TaxonomyRegistry,
    vocab: &'a Vocabulary,
    catalog: AssetCatalog,
    loader: Option<AssetLoader>,
    phase: BindingPhase,
    cache: BTreeMap<BodySide, Arc<BodyView>>,
    selection: SelectionState,
    mode: ViewMode,
    hovered: Option<MuscleKey>,
    latest_token: u64,
}

impl fmt::Debug for DiagramBinding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramBinding")
            .field("phase", &self.phase)
            .field("mode", &self.mode)
            .field("selection", &self.selection)
            .field("latest_token", &self.latest_token)
            .finish()
    }
}

impl<'a> DiagramBinding<'a> {
    pub fn new(
        registry: &'a TaxonomyRegistry,
        vocab: &'a Vocabulary,
        catalog: AssetCatalog,
        mode: ViewMode,
    ) -> Self {
        Self {
            registry,
            vocab,
            catalog,
            loader: Some(AssetLoader::spawn()),
            phase: BindingPhase::Uninitialized,
            cache: BTreeMap::new(),
            selection: SelectionState::new(),
            mode,
            hovered: None,
            latest_token: 0,
        }
    }

    /// A binding without a loader thread; loads complete only through
    /// [`DiagramBinding::complete_load`]. Used by tests to drive the
    /// state machine deterministically, including out-of-order completions.
    pub fn detached(
        registry: &'a TaxonomyRegistry,
        vocab: &'a Vocabulary,
        catalog: AssetCatalog,
        mode: ViewMode,
    ) -> Self {
        Self {
            registry,
            vocab,
            catalog,
            loader: None,
            phase: BindingPhase::Uninitialized,
            cache: BTreeMap::new(),
            selection: SelectionState::new(),
            mode,
            hovered: None,
            latest_token: 0,
        }
    }

    pub fn phase(&self) -> &BindingPhase {
        &self.phase
    }

    pub fn view(&self) -> Option<&Arc<BodyView>> {
        match &self.phase {
            BindingPhase::Ready { view } => Some(view),
            _ => None,
        }
    }

    pub fn active_side(&self) -> Option<BodySide> {
        match &self.phase {
            BindingPhase::Uninitialized => None,
            BindingPhase::Loading { side } | BindingPhase::Failed { side, .. } => Some(*side),
            BindingPhase::Ready { view } => Some(view.side()),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Changes how the stored selection is displayed and grouped. The
    /// selection itself is untouched; mode is display-only.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn snapshot(&self) -> Vec<MuscleKey> {
        self.selection.snapshot()
    }

    pub fn hovered(&self) -> Option<&MuscleKey> {
        self.hovered.as_ref()
    }

    /// Requests a body side. Cached sides become ready immediately; anything
    /// else goes through the loader. Returns the request token; any
    /// completion carrying an older token is discarded (last request wins).
    pub fn switch_side(&mut self, side: BodySide) -> u64 {
        self.latest_token += 1;
        let token = self.latest_token;
        self.hovered = None;

        if let Some(view) = self.cache.get(&side) {
            self.phase = BindingPhase::Ready { view: view.clone() };
            return token;
        }

        self.phase = BindingPhase::Loading { side };
        if let Some(loader) = &self.loader {
            let request = LoadRequest {
                side,
                token,
                source: self.catalog.source_for(side),
            };
            let _ = loader.requests.send(request);
        }
        token
    }

    /// Re-issues the current side's load after a failure.
    pub fn retry(&mut self) -> Option<u64> {
        match &self.phase {
            BindingPhase::Failed { side, .. } => {
                let side = *side;
                Some(self.switch_side(side))
            }
            _ => None,
        }
    }

    /// Drains loader completions. Call once per event-loop tick.
    pub fn poll(&mut self) {
        let mut completed = Vec::new();
        if let Some(loader) = &self.loader {
            while let Ok(result) = loader.results.try_recv() {
                completed.push(result);
            }
        }
        for LoadResult {
            side,
            token,
            result,
        } in completed
        {
            self.complete_load(side, token, result);
        }
    }

    /// Applies one load completion. Successfully parsed documents are cached
    /// whatever their token, but only the latest-issued token may move the
    /// phase: a stale completion never overwrites a newer request's state.
    pub fn complete_load(
        &mut self,
        side: BodySide,
        token: u64,
        result: Result<BodyAsset, AssetError>,
    ) {
        let view = match result {
            Ok(asset) => {
                let view = Arc::new(BodyView::from_asset(side, asset, self.vocab));
                self.cache.insert(side, view.clone());
                Ok(view)
            }
            Err(err) => Err(err),
        };

        if token != self.latest_token {
            return;
        }

        self.phase = match view {
            Ok(view) => BindingPhase::Ready { view },
            Err(err) => BindingPhase::Failed {
                side,
                message: err.to_string(),
            },
        };
    }

    /// Updates hover from a cell position. The hovered key covers the whole
    /// bilateral region group, never one mirrored side alone.
    pub fn set_cursor(&mut self, x: usize, y: usize) {
        self.hovered = self
            .view()
            .and_then(|view| view.key_at(x, y))
            .cloned();
    }

    /// Toggles the region group under the cursor: the single muscle in
    /// advanced mode, the whole simple group it belongs to in simple mode.
    pub fn toggle_hovered(&mut self) -> SelectionDelta {
        let Some(key) = self.hovered.clone() else {
            return SelectionDelta::default();
        };
        self.toggle_region_key(&key)
    }

    /// Same toggle a diagram click performs, for a region's canonical key.
    pub fn toggle_region_key(&mut self, key: &MuscleKey) -> SelectionDelta {
        match self.mode {
            ViewMode::Advanced => self.selection.toggle_muscle(key),
            ViewMode::Simple => match self.registry.parent_of(key) {
                Some(parent) => {
                    let parent = parent.clone();
                    self.selection.toggle_group(self.registry, &parent)
                }
                None => SelectionDelta::default(),
            },
        }
    }

    /// Legend clicks carry a key already in the current mode's tier and
    /// perform the same toggle as the diagram.
    pub fn toggle_legend_key(&mut self, key: &MuscleKey) -> SelectionDelta {
        self.selection.toggle(self.registry, key, self.mode)
    }

    /// Display status for a region's canonical key under the current mode.
    pub fn region_status(&self, key: &MuscleKey) -> GroupStatus {
        self.selection.display_status(self.registry, key, self.mode)
    }

    /// Legend rows for the active side in the current mode: simple groups
    /// with at least one granular key on this side, or the granular keys
    /// themselves in advanced mode. Order follows the taxonomy declaration.
    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        let Some(side) = self.active_side() else {
            return Vec::new();
        };

        match self.mode {
            ViewMode::Simple => self
                .registry
                .keys(Tier::Simple)
                .filter(|group| {
                    self.registry
                        .children_of(group)
                        .iter()
                        .any(|child| self.registry.side_of(child) == Some(side))
                })
                .map(|group| LegendEntry {
                    key: group.clone(),
                    label: self.registry.label_of(group),
                    status: self.selection.group_status(self.registry, group),
                })
                .collect(),
            ViewMode::Advanced => self
                .registry
                .rollup_keys_on_side(side)
                .into_iter()
                .map(|key| {
                    let status = if self.selection.is_selected(&key) {
                        GroupStatus::Full
                    } else {
                        GroupStatus::Empty
                    };
                    LegendEntry {
                        label: self.registry.label_of(&key),
                        key,
                        status,
                    }
                })
                .collect(),
        }
    }

    /// Selects every granular key on the active side.
    pub fn select_all_active(&mut self) -> SelectionDelta {
        match self.active_side() {
            Some(side) => self.selection.select_all(self.registry, side),
            None => SelectionDelta::default(),
        }
    }

    /// Clears every granular key on the active side.
    pub fn clear_active(&mut self) -> SelectionDelta {
        match self.active_side() {
            Some(side) => self.selection.clear(self.registry, side),
            None => SelectionDelta::default(),
        }
    }
}

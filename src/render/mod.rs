// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering for body views and legends.
//!
//! Renderers produce plain text plus a stable highlight index that the TUI
//! uses for cell-accurate region styling. Nothing here knows about the
//! terminal or about selection; styling by selection state is the shell's
//! job, which keeps this layer headlessly testable.

use std::collections::BTreeMap;

use crate::diagram::{BodyView, LegendEntry};
use crate::model::{GroupStatus, MuscleKey};

/// A contiguous span of cells within a single rendered line.
///
/// Coordinates are `(y, x0, x1)` in character-cell indices, inclusive,
/// relative to the returned text lines.
pub type LineSpan = (usize, usize, usize);

/// Mapping from canonical keys to the spans backing them. A bilateral key
/// owns the spans of all its mirrored regions, so styling one key always
/// styles the whole group.
pub type HighlightIndex = BTreeMap<MuscleKey, Vec<LineSpan>>;

pub const FILL_INTERACTIVE: char = '▓';
pub const FILL_INERT: char = '░';

/// Body render output plus the indices the shell styles from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedBodyRender {
    pub text: String,
    pub highlight_index: HighlightIndex,
    pub inert_spans: Vec<LineSpan>,
}

/// Renders a body view to text. Interactive regions fill with
/// [`FILL_INTERACTIVE`], inert regions with [`FILL_INERT`], and undeclared
/// characters (vendor outlines, whitespace) pass through verbatim.
pub fn render_body_view(view: &BodyView) -> AnnotatedBodyRender {
    let asset = view.asset();
    let mut lines = Vec::with_capacity(asset.height());
    let mut highlight_index: HighlightIndex = BTreeMap::new();
    let mut inert_spans = Vec::new();

    for y in 0..asset.height() {
        let mut line = String::new();
        let mut open: Option<(char, usize)> = None;

        for x in 0..asset.width() {
            let code = asset.code_at(x, y);
            let ch = asset.char_at(x, y).unwrap_or(' ');

            match code {
                Some(code) if view.is_inert(code) => line.push(FILL_INERT),
                Some(_) => line.push(FILL_INTERACTIVE),
                None => line.push(ch),
            }

            match (open, code) {
                (Some((prev, _)), Some(current)) if prev == current => {}
                (Some((prev, x0)), _) => {
                    record_span(view, &mut highlight_index, &mut inert_spans, prev, (y, x0, x - 1));
                    open = code.map(|current| (current, x));
                }
                (None, Some(current)) => open = Some((current, x)),
                (None, None) => {}
            }
        }

        if let Some((prev, x0)) = open {
            record_span(
                view,
                &mut highlight_index,
                &mut inert_spans,
                prev,
                (y, x0, asset.width() - 1),
            );
        }

        lines.push(line.trim_end().to_owned());
    }

    AnnotatedBodyRender {
        text: lines.join("\n"),
        highlight_index,
        inert_spans,
    }
}

fn record_span(
    view: &BodyView,
    highlight_index: &mut HighlightIndex,
    inert_spans: &mut Vec<LineSpan>,
    code: char,
    span: LineSpan,
) {
    match view.key_for_code(code) {
        Some(key) => highlight_index.entry(key.clone()).or_default().push(span),
        None => inert_spans.push(span),
    }
}

/// Tri-state legend indicator mirroring diagram state.
pub fn status_indicator(status: GroupStatus) -> &'static str {
    match status {
        GroupStatus::Full => "[x]",
        GroupStatus::Partial => "[-]",
        GroupStatus::Empty => "[ ]",
    }
}

/// One formatted legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendLine {
    pub key: MuscleKey,
    pub text: String,
    pub status: GroupStatus,
}

pub fn render_legend(entries: &[LegendEntry]) -> Vec<LegendLine> {
    entries
        .iter()
        .map(|entry| LegendLine {
            key: entry.key.clone(),
            text: format!("{} {}", status_indicator(entry.status), entry.label),
            status: entry.status,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{render_body_view, render_legend, status_indicator, FILL_INERT, FILL_INTERACTIVE};
    use crate::diagram::{BodyAsset, BodyView, LegendEntry};
    use crate::model::{BodySide, GroupStatus, MuscleKey};
    use crate::vocab::Vocabulary;

    fn key(value: &str) -> MuscleKey {
        MuscleKey::new(value).expect("muscle key")
    }

    #[test]
    fn renders_fills_and_passes_background_through() {
        let doc = "\
b bicep-outer-left
B bicep-outer-right
h head
---
 h |
b B";
        let asset = BodyAsset::parse(doc).expect("parses");
        let view = BodyView::from_asset(BodySide::Front, asset, Vocabulary::builtin());
        let render = render_body_view(&view);

        let lines: Vec<&str> = render.text.split('\n').collect();
        assert_eq!(lines[0], format!(" {FILL_INERT} |"));
        assert_eq!(
            lines[1],
            format!("{FILL_INTERACTIVE} {FILL_INTERACTIVE}")
        );
    }

    #[test]
    fn bilateral_spans_index_under_one_key() {
        let doc = "\
b bicep-outer-left
B bicep-outer-right
---
bb BB";
        let asset = BodyAsset::parse(doc).expect("parses");
        let view = BodyView::from_asset(BodySide::Front, asset, Vocabulary::builtin());
        let render = render_body_view(&view);

        let spans = render
            .highlight_index
            .get(&key("long-head-bicep"))
            .expect("bicep spans");
        assert_eq!(spans, &vec![(0, 0, 1), (0, 3, 4)]);
    }

    #[test]
    fn inert_regions_are_indexed_separately() {
        let doc = "\
h head
b bicep-outer-left
---
hh b";
        let asset = BodyAsset::parse(doc).expect("parses");
        let view = BodyView::from_asset(BodySide::Front, asset, Vocabulary::builtin());
        let render = render_body_view(&view);

        assert_eq!(render.inert_spans, vec![(0, 0, 1)]);
        assert_eq!(render.highlight_index.len(), 1);
    }

    #[test]
    fn legend_lines_carry_tri_state_indicators() {
        let entries = vec![
            LegendEntry {
                key: key("chest"),
                label: "Chest".to_owned(),
                status: GroupStatus::Full,
            },
            LegendEntry {
                key: key("biceps"),
                label: "Biceps".to_owned(),
                status: GroupStatus::Partial,
            },
            LegendEntry {
                key: key("core"),
                label: "Core".to_owned(),
                status: GroupStatus::Empty,
            },
        ];

        let lines = render_legend(&entries);
        assert_eq!(lines[0].text, "[x] Chest");
        assert_eq!(lines[1].text, "[-] Biceps");
        assert_eq!(lines[2].text, "[ ] Core");
    }

    #[test]
    fn indicators_cover_all_statuses() {
        assert_eq!(status_indicator(GroupStatus::Full), "[x]");
        assert_eq!(status_indicator(GroupStatus::Partial), "[-]");
        assert_eq!(status_indicator(GroupStatus::Empty), "[ ]");
    }
}

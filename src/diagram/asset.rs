// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Body-map document parsing.
//!
//! A body map is an externally supplied text document: a header tagging
//! single-character region codes with vendor slugs, a `---` separator, then a
//! character grid in which every cell equal to a declared code belongs to
//! that region. The parser only locates codes and slugs; unknown header
//! lines and undeclared grid characters are passed over, so a malformed
//! document yields fewer interactive regions rather than a hard failure.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{BodySide, RegionSlug};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetParseError {
    /// No `---` separator, or nothing but blank lines after it. A document
    /// without a grid has nothing to render and is surfaced as a load
    /// failure rather than an empty diagram.
    MissingGrid,
}

impl fmt::Display for AssetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingGrid => f.write_str("body-map document has no grid section"),
        }
    }
}

impl std::error::Error for AssetParseError {}

/// One parsed body-map document: the region code table and the cell grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyAsset {
    regions: BTreeMap<char, RegionSlug>,
    rows: Vec<Vec<char>>,
    width: usize,
}

fn region_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\S)\s+([a-z0-9-]+)\s*$").expect("region tag pattern compiles")
    })
}

impl BodyAsset {
    pub fn parse(doc: &str) -> Result<Self, AssetParseError> {
        let mut regions = BTreeMap::new();
        let mut lines = doc.lines();

        for line in lines.by_ref() {
            let trimmed = line.trim();
            if trimmed.starts_with("---") {
                break;
            }
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some(captures) = region_tag_pattern().captures(trimmed) else {
                continue;
            };
            let Some(code) = captures[1].chars().next() else {
                continue;
            };
            let Ok(slug) = RegionSlug::new(&captures[2]) else {
                continue;
            };
            // First declaration wins; a duplicated code is a vendor mistake
            // we tolerate rather than propagate.
            regions.entry(code).or_insert(slug);
        }

        let mut rows: Vec<Vec<char>> = lines.map(|line| line.chars().collect()).collect();
        while rows.last().is_some_and(|row| row.iter().all(|ch| ch.is_whitespace())) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(AssetParseError::MissingGrid);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Ok(Self {
            regions,
            rows,
            width,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// The declared region code at a cell, or `None` for background and
    /// undeclared characters.
    pub fn code_at(&self, x: usize, y: usize) -> Option<char> {
        let ch = *self.rows.get(y)?.get(x)?;
        self.regions.contains_key(&ch).then_some(ch)
    }

    /// The raw grid character at a cell (background passes through so
    /// vendors can draw outlines the renderer keeps verbatim).
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.rows.get(y)?.get(x).copied()
    }

    pub fn regions(&self) -> &BTreeMap<char, RegionSlug> {
        &self.regions
    }

    pub fn slug_of(&self, code: char) -> Option<&RegionSlug> {
        self.regions.get(&code)
    }

    /// All cells painted with `code`, row-major.
    pub fn region_cells(&self, code: char) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, ch) in row.iter().enumerate() {
                if *ch == code {
                    cells.push((x, y));
                }
            }
        }
        cells
    }
}

/// Built-in demo documents, used by `--demo` and as test fixtures.
pub fn demo_document(side: BodySide) -> &'static str {
    match side {
        BodySide::Front => DEMO_FRONT,
        BodySide::Rear => DEMO_REAR,
    }
}

const DEMO_FRONT: &str = "\
# myotome body map: front
h head
n neck-left
N neck-right
s deltoid-side-left
S deltoid-side-right
d deltoid-front-left
D deltoid-front-right
u chest-upper-left
U chest-upper-right
m chest-mid-left
M chest-mid-right
w chest-lower-left
W chest-lower-right
b bicep-outer-left
B bicep-outer-right
i bicep-inner-left
I bicep-inner-right
f forearm-front-left
F forearm-front-right
1 abs-upper
2 abs-lower
o oblique-left
O oblique-right
x hands
9 hip
q quad-mid-left
Q quad-mid-right
e quad-outer-left
E quad-outer-right
v quad-inner-left
V quad-inner-right
k knee-left
K knee-right
z feet
---
         hhhh
         hhhh
          nN
   sdd  uuu UUU  DDS
  ssdd  mmm MMM  DDSS
  bb    www WWW    BB
  bbi  oo 1 1 OO  IBB
  ffi  oo 1 1 OO  IFF
  ff   oo 2 2 OO   FF
  xx    9 22 9    xx
        qq  QQ
       eqqv VQQE
       eqqv VQQE
        kk  KK
        zz  zz
        zz  zz";

const DEMO_REAR: &str = "\
# myotome body map: rear
h head-back
t traps
r deltoid-rear-left
R deltoid-rear-right
l lat-left
L lat-right
m rhomboid-left
M rhomboid-right
w lower-back
g tricep-long-left
G tricep-long-right
a tricep-lateral-left
A tricep-lateral-right
d tricep-medial-left
D tricep-medial-right
e elbow-left
E elbow-right
f forearm-back-left
F forearm-back-right
u glute-upper-left
U glute-upper-right
b glute-left
B glute-right
o hamstring-outer-left
O hamstring-outer-right
i hamstring-inner-left
I hamstring-inner-right
c calf-left
C calf-right
s calf-lower-left
S calf-lower-right
y heel-left
Y heel-right
---
         hhhh
         hhhh
         tttt
   rr  ttmmMMtt  RR
  rgg  lmm  MML  GGR
  gga  ll    LL  AGG
  dae  ll    LL  EAD
  dff   wwww    FFD
   ff   wwww    FF
        uu  UU
      bbbb  BBBB
      bbbb  BBBB
      ooii  IIOO
      ooii  IIOO
       cc    CC
       ss    SS
       yy    YY";

#[cfg(test)]
mod tests {
    use super::{AssetParseError, BodyAsset, demo_document};
    use crate::model::{BodySide, RegionSlug};

    fn slug(value: &str) -> RegionSlug {
        RegionSlug::new(value).expect("region slug")
    }

    #[test]
    fn parses_demo_documents() {
        for side in [BodySide::Front, BodySide::Rear] {
            let asset = BodyAsset::parse(demo_document(side)).expect("demo parses");
            assert!(asset.height() > 0);
            assert!(!asset.regions().is_empty());

            // Every declared region is painted somewhere on the grid.
            for code in asset.regions().keys() {
                assert!(
                    !asset.region_cells(*code).is_empty(),
                    "code {code:?} on {side} has no cells"
                );
            }
        }
    }

    #[test]
    fn bilateral_slugs_use_distinct_codes() {
        let asset = BodyAsset::parse(demo_document(BodySide::Front)).expect("demo parses");

        assert_eq!(asset.slug_of('b'), Some(&slug("bicep-outer-left")));
        assert_eq!(asset.slug_of('B'), Some(&slug("bicep-outer-right")));
    }

    #[test]
    fn malformed_header_lines_are_skipped() {
        let doc = "\
x chest-upper-left
?? not a tag line
y Not-A-Slug
# comment
z abs-upper
---
xyz";
        let asset = BodyAsset::parse(doc).expect("parses");

        assert_eq!(asset.regions().len(), 2);
        assert_eq!(asset.slug_of('x'), Some(&slug("chest-upper-left")));
        assert_eq!(asset.slug_of('z'), Some(&slug("abs-upper")));
        assert_eq!(asset.slug_of('y'), None);
        // Undeclared characters read as background.
        assert_eq!(asset.code_at(1, 0), None);
        assert_eq!(asset.char_at(1, 0), Some('y'));
    }

    #[test]
    fn document_without_grid_fails_to_parse() {
        let doc = "x chest-upper-left\n---\n\n  \n";
        assert_eq!(BodyAsset::parse(doc), Err(AssetParseError::MissingGrid));

        let doc = "x chest-upper-left\n";
        assert_eq!(BodyAsset::parse(doc), Err(AssetParseError::MissingGrid));
    }

    #[test]
    fn duplicate_code_keeps_first_declaration() {
        let doc = "x chest-upper-left\nx abs-upper\n---\nx";
        let asset = BodyAsset::parse(doc).expect("parses");
        assert_eq!(asset.slug_of('x'), Some(&slug("chest-upper-left")));
    }

    #[test]
    fn region_cells_are_row_major_and_exact() {
        let doc = "x chest-upper-left\n---\n.x.\nxx.";
        let asset = BodyAsset::parse(doc).expect("parses");
        assert_eq!(asset.region_cells('x'), vec![(1, 0), (0, 1), (1, 1)]);
        assert_eq!(asset.width(), 3);
        assert_eq!(asset.height(), 2);
    }
}

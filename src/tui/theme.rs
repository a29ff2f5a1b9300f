// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Myotome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Myotome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::model::GroupStatus;

/// Style set for the diagram shell, with an optional palette override from
/// `MYOTOME_PALETTE` (eight comma-separated colors: fg, bg, selected,
/// partial, hover, inert, error, accent).
#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?;
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            self.base_style().fg(self.pick(PaletteSlot::Accent, Color::Yellow))
        } else {
            self.base_style()
        }
    }

    /// Region fill style for a selection status.
    pub(crate) fn region_style(&self, status: GroupStatus) -> Style {
        match status {
            GroupStatus::Full => self
                .base_style()
                .fg(self.pick(PaletteSlot::Selected, Color::LightGreen))
                .add_modifier(Modifier::BOLD),
            GroupStatus::Partial => self
                .base_style()
                .fg(self.pick(PaletteSlot::Partial, Color::Yellow)),
            GroupStatus::Empty => self.base_style().fg(Color::Gray),
        }
    }

    pub(crate) fn hover_style(&self, status: GroupStatus) -> Style {
        self.region_style(status).add_modifier(Modifier::REVERSED)
    }

    pub(crate) fn inert_style(&self) -> Style {
        self.base_style().fg(self.pick(PaletteSlot::Inert, Color::DarkGray))
    }

    pub(crate) fn cursor_style(&self) -> Style {
        self.base_style()
            .fg(self.pick(PaletteSlot::Hover, Color::Cyan))
            .add_modifier(Modifier::REVERSED | Modifier::BOLD)
    }

    pub(crate) fn legend_row_style(&self, status: GroupStatus, selected: bool) -> Style {
        let base = self.region_style(status);
        if selected {
            base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            base
        }
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(self.pick(PaletteSlot::Error, Color::Red))
    }

    pub(crate) fn footer_label_style(&self) -> Style {
        self.base_style().fg(Color::Gray)
    }

    pub(crate) fn footer_key_style(&self) -> Style {
        self.base_style().fg(self.pick(PaletteSlot::Hover, Color::Cyan))
    }

    fn pick(&self, slot: PaletteSlot, fallback: Color) -> Color {
        match &self.palette {
            Some(palette) => palette.slot(slot),
            None => fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PaletteSlot {
    Selected,
    Partial,
    Hover,
    Inert,
    Error,
    Accent,
}

#[derive(Debug, Clone)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    slots: [Color; 6],
}

impl TuiPalette {
    const CSV_LEN: usize = 8;

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg,selected,partial,hover,inert,error,accent), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let fg = parse_palette_color(parts[0])?;
        let bg = parse_palette_color(parts[1])?;

        let mut slots = [Color::Reset; 6];
        for (idx, part) in parts.iter().skip(2).enumerate() {
            slots[idx] = parse_palette_color(part)?;
        }

        Ok(Self { fg, bg, slots })
    }

    fn slot(&self, slot: PaletteSlot) -> Color {
        let idx = match slot {
            PaletteSlot::Selected => 0,
            PaletteSlot::Partial => 1,
            PaletteSlot::Hover => 2,
            PaletteSlot::Inert => 3,
            PaletteSlot::Error => 4,
            PaletteSlot::Accent => 5,
        };
        self.slots[idx]
    }
}

fn palette_override_from_env() -> Result<Option<TuiPalette>, ThemeError> {
    let value = match env::var("MYOTOME_PALETTE") {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: "MYOTOME_PALETTE".to_owned(),
                value: "<non-unicode>".to_owned(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = TuiPalette::parse_csv(trimmed).map_err(|error| ThemeError::InvalidEnv {
        name: "MYOTOME_PALETTE".to_owned(),
        value: format!("{trimmed} ({error})"),
    })?;

    Ok(Some(parsed))
}

fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Ok(Color::Rgb(r, g, b))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use super::TuiPalette;
    use ratatui::style::Color;

    #[test]
    fn palette_override_parses_valid_csv() {
        let palette = TuiPalette::parse_csv(
            "#111111,#222222,#00ff00,#ffff00,#00ffff,#444444,#ff0000,#ff00ff",
        )
        .expect("palette");

        assert_eq!(palette.fg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(palette.bg, Color::Rgb(0x22, 0x22, 0x22));
        assert_eq!(palette.slots[0], Color::Rgb(0, 0xff, 0));
        assert_eq!(palette.slots[4], Color::Rgb(0xff, 0, 0));
    }

    #[test]
    fn palette_override_rejects_wrong_arity() {
        let err = TuiPalette::parse_csv("#111111,#222222").unwrap_err();
        assert!(err.contains("expected"));
    }

    #[test]
    fn palette_override_rejects_bad_hex() {
        let err = TuiPalette::parse_csv(
            "#111111,#222222,#00ff00,#ffff00,#00ffff,#444444,#ff0000,notacolor",
        )
        .unwrap_err();
        assert!(err.contains("invalid hex color"));
    }
}

//! Label geometry: layout parameters, per-field multipliers, and the
//! vertical cursor.
//!
//! All coordinates are printer dots. Configured margins are in units of
//! 8 dots (one millimetre at 203 dpi).

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// Label width in dots (`^PW`).
pub const LABEL_WIDTH_DOTS: u32 = 472;
/// Label length in dots (`^LL`).
pub const LABEL_LENGTH_DOTS: u32 = 1181;
/// Field origin x used when the layout is centered.
pub const CENTER_X_DOTS: u32 = LABEL_WIDTH_DOTS / 2;
/// Dots per configured margin unit.
pub const MARGIN_UNIT_DOTS: u32 = 8;

/// Caller-supplied layout parameters. Never stored or mutated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Base size for the title line (code). Valid range 10-30.
    pub title_font_size: u32,
    /// Base size for headers, batch code and expiry. Valid range 8-20.
    pub subtitle_font_size: u32,
    /// Base size for description, care and timestamp lines. Valid range 6-16.
    pub body_font_size: u32,
    /// Vertical spacing unit in dots. Valid range 5-50.
    pub line_spacing: u32,
    /// Left margin in 8-dot units when not centered. Valid range 5-50.
    pub margin_x: u32,
    /// Top margin in 8-dot units. Valid range 5-50.
    pub margin_y: u32,
    /// Center every field on the label instead of left-aligning.
    pub centered: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title_font_size: 18,
            subtitle_font_size: 14,
            body_font_size: 12,
            line_spacing: 25,
            margin_x: 20,
            margin_y: 20,
            centered: true,
        }
    }
}

impl LayoutConfig {
    /// Documented valid ranges, by field name.
    pub const RANGES: [(&'static str, RangeInclusive<u32>); 6] = [
        ("title_font_size", 10..=30),
        ("subtitle_font_size", 8..=20),
        ("body_font_size", 6..=16),
        ("line_spacing", 5..=50),
        ("margin_x", 5..=50),
        ("margin_y", 5..=50),
    ];

    /// Check every numeric field against [`LayoutConfig::RANGES`].
    pub fn validate(&self) -> Result<(), LabelError> {
        let values = [
            self.title_font_size,
            self.subtitle_font_size,
            self.body_font_size,
            self.line_spacing,
            self.margin_x,
            self.margin_y,
        ];
        for ((field, range), value) in Self::RANGES.iter().zip(values) {
            if !range.contains(&value) {
                return Err(LabelError::InvalidLayout {
                    field: *field,
                    reason: format!(
                        "{value} is outside {}..={}",
                        range.start(),
                        range.end()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Field origin x for every field on the label.
    pub fn origin_x(&self) -> u32 {
        if self.centered {
            CENTER_X_DOTS
        } else {
            self.margin_x * MARGIN_UNIT_DOTS
        }
    }

    /// Orientation letter written after `^A0`.
    pub fn orientation(&self) -> char {
        if self.centered { 'C' } else { 'N' }
    }

    /// Font height in dots for a field kind.
    pub fn font_height(&self, kind: FieldKind) -> u32 {
        let base = match kind {
            FieldKind::Title => self.title_font_size,
            FieldKind::Subtitle => self.subtitle_font_size,
            FieldKind::Body | FieldKind::Care => self.body_font_size,
        };
        base * kind.metrics().font_multiplier
    }
}

/// Visual role of an emitted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Material code line.
    Title,
    /// Headers, batch code, expiry.
    Subtitle,
    /// Description lines and print timestamp.
    Body,
    /// Care-instruction lines.
    Care,
}

/// Per-kind constants of the label template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMetrics {
    /// Multiplier applied to the configured font size.
    pub font_multiplier: u32,
    /// Cursor advance after the field, in tenths of `line_spacing`.
    pub advance_tenths: u32,
}

impl FieldKind {
    /// Template constants for this kind.
    pub const fn metrics(self) -> FieldMetrics {
        match self {
            FieldKind::Title => FieldMetrics {
                font_multiplier: 3,
                advance_tenths: 30,
            },
            FieldKind::Subtitle => FieldMetrics {
                font_multiplier: 2,
                advance_tenths: 20,
            },
            FieldKind::Body => FieldMetrics {
                font_multiplier: 2,
                advance_tenths: 15,
            },
            FieldKind::Care => FieldMetrics {
                font_multiplier: 2,
                advance_tenths: 12,
            },
        }
    }
}

/// Extra advance after the description and care blocks, in tenths.
pub const BLOCK_GAP_TENTHS: u32 = 10;

/// Vertical position tracker, kept in tenths of a dot so fractional
/// multipliers accumulate without drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    tenths: u32,
    line_spacing: u32,
}

impl Cursor {
    /// Start at the top margin of `layout`.
    pub fn new(layout: &LayoutConfig) -> Self {
        Self {
            tenths: layout.margin_y * MARGIN_UNIT_DOTS * 10,
            line_spacing: layout.line_spacing,
        }
    }

    /// Current y in whole dots, rounded half up.
    pub fn y(&self) -> u32 {
        (self.tenths + 5) / 10
    }

    /// Advance past a field of `kind`.
    pub fn advance(&mut self, kind: FieldKind) {
        self.advance_tenths(kind.metrics().advance_tenths);
    }

    /// Advance by the block gap.
    pub fn gap(&mut self) {
        self.advance_tenths(BLOCK_GAP_TENTHS);
    }

    fn advance_tenths(&mut self, tenths: u32) {
        self.tenths += self.line_spacing * tenths;
    }
}

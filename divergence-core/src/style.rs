//! Line styles for the rendering collaborator.
//!
//! Styles are plain configuration values. The drawable `Pen` is derived on
//! demand by [`LineStyle::pen`]; nothing here is touched by detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::detection::DivergenceStore;
use crate::domain::{DivergenceRecord, DivergenceType};

/// 24-bit color, serialized as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GREEN: Rgb = Rgb::new(0, 128, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid color '{s}', expected #rrggbb"));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid color '{s}'"))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Stroke pattern of a divergence line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stroke {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
}

impl Stroke {
    /// Dash pattern in units of line width (on, off, on, off...). Empty = solid.
    pub fn dash_pattern(self) -> &'static [f32] {
        match self {
            Stroke::Solid => &[],
            Stroke::Dash => &[4.0, 2.0],
            Stroke::Dot => &[1.0, 2.0],
            Stroke::DashDot => &[4.0, 2.0, 1.0, 2.0],
        }
    }
}

/// Style of one divergence type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineStyle {
    pub color: Rgb,
    pub enabled: bool,
    pub stroke: Stroke,
    pub width: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Rgb::GREEN,
            enabled: true,
            stroke: Stroke::Solid,
            width: 1,
        }
    }
}

/// Drawable pen derived from a [`LineStyle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    pub color: Rgb,
    pub width: f32,
    /// Dash lengths scaled by width; empty for a solid line.
    pub dashes: Vec<f32>,
}

impl LineStyle {
    /// Derive the pen, or `None` when this divergence type is not drawn.
    pub fn pen(&self) -> Option<Pen> {
        if !self.enabled || self.width == 0 {
            return None;
        }
        let width = self.width as f32;
        Some(Pen {
            color: self.color,
            width,
            dashes: self
                .stroke
                .dash_pattern()
                .iter()
                .map(|d| d * width)
                .collect(),
        })
    }
}

/// One style per divergence type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSet {
    pub regular_bullish: LineStyle,
    pub hidden_bullish: LineStyle,
    pub regular_bearish: LineStyle,
    pub hidden_bearish: LineStyle,
}

impl Default for StyleSet {
    fn default() -> Self {
        Self {
            regular_bullish: LineStyle {
                color: Rgb::GREEN,
                enabled: true,
                stroke: Stroke::Solid,
                width: 2,
            },
            hidden_bullish: LineStyle {
                color: Rgb::GREEN,
                enabled: false,
                stroke: Stroke::DashDot,
                width: 1,
            },
            regular_bearish: LineStyle {
                color: Rgb::RED,
                enabled: true,
                stroke: Stroke::Solid,
                width: 2,
            },
            hidden_bearish: LineStyle {
                color: Rgb::RED,
                enabled: false,
                stroke: Stroke::DashDot,
                width: 1,
            },
        }
    }
}

impl StyleSet {
    pub fn style(&self, kind: DivergenceType) -> &LineStyle {
        match kind {
            DivergenceType::RegularBullish => &self.regular_bullish,
            DivergenceType::HiddenBullish => &self.hidden_bullish,
            DivergenceType::RegularBearish => &self.regular_bearish,
            DivergenceType::HiddenBearish => &self.hidden_bearish,
        }
    }

    pub fn style_mut(&mut self, kind: DivergenceType) -> &mut LineStyle {
        match kind {
            DivergenceType::RegularBullish => &mut self.regular_bullish,
            DivergenceType::HiddenBullish => &mut self.hidden_bullish,
            DivergenceType::RegularBearish => &mut self.regular_bearish,
            DivergenceType::HiddenBearish => &mut self.hidden_bearish,
        }
    }

    pub fn is_enabled(&self, kind: DivergenceType) -> bool {
        self.style(kind).enabled
    }

    /// Enable every divergence type.
    pub fn enable_all(&mut self) {
        for kind in DivergenceType::ALL {
            self.style_mut(kind).enabled = true;
        }
    }
}

/// Records whose type is enabled, paired with the pen to draw them with.
pub fn visible<'a>(
    store: &'a DivergenceStore,
    styles: &'a StyleSet,
) -> impl Iterator<Item = (&'a DivergenceRecord, Pen)> + 'a {
    store
        .iter()
        .filter_map(move |record| styles.style(record.kind).pen().map(|pen| (record, pen)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Anchor;
    use crate::testutil::time_at;

    fn record(kind: DivergenceType) -> DivergenceRecord {
        let anchor = |index| Anchor {
            index,
            time: time_at(index),
            price: 100.0,
        };
        DivergenceRecord::new(kind, anchor(1), anchor(5))
    }

    #[test]
    fn default_styles_hide_hidden_divergences() {
        let styles = StyleSet::default();
        assert!(styles.is_enabled(DivergenceType::RegularBullish));
        assert!(styles.is_enabled(DivergenceType::RegularBearish));
        assert!(!styles.is_enabled(DivergenceType::HiddenBullish));
        assert!(!styles.is_enabled(DivergenceType::HiddenBearish));
        assert_eq!(styles.regular_bearish.color, Rgb::RED);
        assert_eq!(styles.hidden_bullish.stroke, Stroke::DashDot);
    }

    #[test]
    fn disabled_style_has_no_pen() {
        let style = LineStyle {
            enabled: false,
            ..LineStyle::default()
        };
        assert_eq!(style.pen(), None);
    }

    #[test]
    fn pen_scales_dashes_by_width() {
        let style = LineStyle {
            stroke: Stroke::Dash,
            width: 3,
            ..LineStyle::default()
        };
        let pen = style.pen().unwrap();
        assert_eq!(pen.width, 3.0);
        assert_eq!(pen.dashes, vec![12.0, 6.0]);
    }

    #[test]
    fn color_hex_roundtrip() {
        let color: Rgb = "#1a2B3c".parse().unwrap();
        assert_eq!(color, Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_string(), "#1a2b3c");
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("zz0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn color_rejects_signs_and_non_hex() {
        assert!("#+1+2+3".parse::<Rgb>().is_err());
        assert!("#-1a2b3".parse::<Rgb>().is_err());
        assert!("#12345g".parse::<Rgb>().is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert_eq!("00ff00".parse::<Rgb>(), Ok(Rgb::new(0, 255, 0)));
    }

    #[test]
    fn visible_filters_disabled_kinds() {
        let mut store = DivergenceStore::new();
        store.add(record(DivergenceType::RegularBullish));
        store.add(record(DivergenceType::HiddenBullish));
        store.add(record(DivergenceType::RegularBearish));

        let styles = StyleSet::default();
        let kinds: Vec<_> = visible(&store, &styles).map(|(r, _)| r.kind).collect();
        assert_eq!(
            kinds,
            vec![DivergenceType::RegularBullish, DivergenceType::RegularBearish]
        );

        let mut all = styles;
        all.enable_all();
        assert_eq!(visible(&store, &all).count(), 3);
    }
}

//! 24-bit colors and HSL conversions.
//!
//! The hex <-> HSL math here is deliberately the integer-rounded variant used
//! by the gradient presets: [`hex_to_hsl`] rounds every component, and the
//! lightness/saturation adjusters go through that rounding. Presets built on
//! top of these functions depend on the exact output, so the arithmetic must
//! stay in this order.

use std::fmt;
use std::str::FromStr;

use palette::{IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// Color
// ============================================================================

/// An opaque 24-bit sRGB color.
///
/// Parsing via [`FromStr`] is the normalization boundary for user input:
/// surrounding whitespace is trimmed, a leading `#` is optional, and exactly
/// six hex digits are required. The canonical text form is lowercase
/// `#rrggbb`.
///
/// ```
/// use appicon_renderer::Color;
///
/// let color: Color = " FF7A18 ".parse().unwrap();
/// assert_eq!(color.to_string(), "#ff7a18");
/// assert!("#fff".parse::<Color>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts into palette's sRGB representation.
    pub fn to_srgb(self) -> Srgb<u8> {
        Srgb::new(self.r, self.g, self.b)
    }

    /// Converts into an opaque tiny-skia color for painting.
    pub fn to_skia(self) -> resvg::tiny_skia::Color {
        resvg::tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }

    /// Rounded HSL components, see [`hex_to_hsl`].
    pub fn to_hsl(self) -> Hsl {
        hex_to_hsl(self)
    }
}

impl From<Srgb<u8>> for Color {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::rgb(rgb.red, rgb.green, rgb.blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// ============================================================================
// HSL
// ============================================================================

/// HSL triple: hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Unrounded HSL derivation of `color`.
    ///
    /// Unlike [`hex_to_hsl`], converting this back with [`hsl_to_hex`]
    /// reproduces the input to within one step per channel.
    pub fn exact(color: Color) -> Self {
        let rgb: Srgb<f64> = color.to_srgb().into_format();
        let hsl: palette::Hsl<palette::encoding::Srgb, f64> = rgb.into_color();
        Self {
            h: hsl.hue.into_positive_degrees(),
            s: hsl.saturation * 100.0,
            l: hsl.lightness * 100.0,
        }
    }

    pub fn to_color(self) -> Color {
        hsl_to_hex(self.h, self.s, self.l)
    }
}

/// Derives integer-rounded HSL components from `color`.
///
/// Achromatic input yields `h = 0, s = 0`. A hue that rounds up to 360 is
/// reported as 0.
pub fn hex_to_hsl(color: Color) -> Hsl {
    let r = color.r as f64 / 255.0;
    let g = color.g as f64 / 255.0;
    let b = color.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };
        (h, s)
    };

    Hsl {
        h: (h * 360.0).round() % 360.0,
        s: (s * 100.0).round(),
        l: (l * 100.0).round(),
    }
}

/// Converts HSL (degrees, percent, percent) to a color using the six 60°
/// sector construction. Channels are rounded to the nearest integer.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> Color {
    let h = h.rem_euclid(360.0);
    let s = s / 100.0;
    let l = l / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::rgb(channel(r), channel(g), channel(b))
}

/// Shifts lightness by `delta` percentage points, clamped to `[0, 100]`.
pub fn adjust_lightness(color: Color, delta: f64) -> Color {
    let hsl = hex_to_hsl(color);
    hsl_to_hex(hsl.h, hsl.s, (hsl.l + delta).clamp(0.0, 100.0))
}

/// Shifts saturation by `delta` percentage points, clamped to `[0, 100]`.
pub fn adjust_saturation(color: Color, delta: f64) -> Color {
    let hsl = hex_to_hsl(color);
    hsl_to_hex(hsl.h, (hsl.s + delta).clamp(0.0, 100.0), hsl.l)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Color {
        s.parse().unwrap()
    }

    fn max_channel_error(a: Color, b: Color) -> u8 {
        a.r.abs_diff(b.r).max(a.g.abs_diff(b.g)).max(a.b.abs_diff(b.b))
    }

    #[test]
    fn parse_normalizes_input() {
        assert_eq!(c("#FF7A18"), Color::rgb(0xff, 0x7a, 0x18));
        assert_eq!(c("44b0b9").to_string(), "#44b0b9");
        assert_eq!(c("  #00ff00\n"), Color::rgb(0, 255, 0));
    }

    #[test]
    fn parse_rejects_malformed_hex() {
        for bad in ["", "#", "#fff", "#12345", "#1234567", "#gg0000", "red", "##ff0000"] {
            let err = bad.parse::<Color>().unwrap_err();
            assert!(matches!(err, Error::InvalidColor(_)), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&Color::rgb(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102ff\"");
        let back: Color = serde_json::from_str("\"#ABCDEF\"").unwrap();
        assert_eq!(back, Color::rgb(0xab, 0xcd, 0xef));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn hex_to_hsl_primaries() {
        assert_eq!(hex_to_hsl(c("#ff0000")), Hsl::new(0.0, 100.0, 50.0));
        assert_eq!(hex_to_hsl(c("#00ff00")), Hsl::new(120.0, 100.0, 50.0));
        assert_eq!(hex_to_hsl(c("#0000ff")), Hsl::new(240.0, 100.0, 50.0));
        assert_eq!(hex_to_hsl(c("#ff7a18")), Hsl::new(25.0, 100.0, 55.0));
        assert_eq!(hex_to_hsl(c("#123456")), Hsl::new(210.0, 65.0, 20.0));
    }

    #[test]
    fn hex_to_hsl_achromatic() {
        assert_eq!(hex_to_hsl(c("#808080")), Hsl::new(0.0, 0.0, 50.0));
        assert_eq!(hex_to_hsl(Color::WHITE), Hsl::new(0.0, 0.0, 100.0));
        assert_eq!(hex_to_hsl(Color::BLACK), Hsl::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn hue_rounding_up_to_360_wraps() {
        let hsl = hex_to_hsl(c("#ff0001"));
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl_to_hex(hsl.h, hsl.s, hsl.l), c("#ff0000"));
    }

    #[test]
    fn hsl_to_hex_sectors() {
        assert_eq!(hsl_to_hex(0.0, 60.0, 45.0), c("#b82e2e"));
        assert_eq!(hsl_to_hex(30.0, 60.0, 45.0), c("#b8732e"));
        assert_eq!(hsl_to_hex(180.0, 65.0, 50.0), c("#2dd2d2"));
        assert_eq!(hsl_to_hex(210.0, 65.0, 20.0), c("#123354"));
        assert_eq!(hsl_to_hex(360.0, 65.0, 50.0), c("#d22d2d"));
    }

    #[test]
    fn adjusters_match_preset_values() {
        assert_eq!(adjust_lightness(c("#ff0000"), -15.0), c("#b30000"));
        assert_eq!(adjust_lightness(c("#44b0b9"), 20.0), c("#8fd0d6"));
        assert_eq!(adjust_lightness(Color::WHITE, 10.0), Color::WHITE);
        assert_eq!(adjust_saturation(c("#808080"), 30.0), c("#a65959"));
        assert_eq!(adjust_saturation(c("#ff7a18"), -40.0), c("#d18147"));
    }

    #[test]
    fn exact_round_trip_within_one_step() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    let color = Color::rgb(r, g, b);
                    let back = Hsl::exact(color).to_color();
                    assert!(
                        max_channel_error(color, back) <= 1,
                        "{color} came back as {back}"
                    );
                }
            }
        }
    }

    #[test]
    fn rounded_round_trip_stays_close() {
        // Integer HSL quantizes lightness to 1%, which can move a channel by a few steps.
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(17) {
                for b in (0..=255u8).step_by(51) {
                    let color = Color::rgb(r, g, b);
                    let hsl = hex_to_hsl(color);
                    let back = hsl_to_hex(hsl.h, hsl.s, hsl.l);
                    assert!(max_channel_error(color, back) <= 5, "{color} came back as {back}");
                }
            }
        }
    }

    #[test]
    fn exact_matches_rounded_for_primaries() {
        let exact = Hsl::exact(c("#00ff00"));
        assert!((exact.h - 120.0).abs() < 1e-9);
        assert!((exact.s - 100.0).abs() < 1e-9);
        assert!((exact.l - 50.0).abs() < 1e-9);
    }
}

//! Procedural color schemes for gradient backgrounds.
//!
//! Every generator draws from an injected [`Rng`], so a seeded generator
//! reproduces the same palette. Draws are unit floats in `[0, 1)`; discrete
//! choices take `floor(u * n)`.

use rand::Rng;
use tracing::trace;

use crate::color::{Color, Hsl, adjust_lightness, adjust_saturation, hex_to_hsl, hsl_to_hex};
use crate::gradient::Shape;

/// Base colors with saturation below this are treated as grayscale.
pub const GRAYSCALE_SATURATION: f64 = 10.0;

/// Angles preferred by [`random_gradient`].
pub const COMMON_ANGLES: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0_f64..1.0)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, n: usize) -> usize {
    ((unit(rng) * n as f64).floor() as usize).min(n - 1)
}

/// Fraction of the way through `count` evenly spaced items.
fn spread(i: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        i as f64 / (count - 1) as f64
    }
}

/// Positions `0..=100` evenly spaced and rounded to whole percents.
fn even_positions(count: usize) -> impl Iterator<Item = f64> {
    (0..count).map(move |i| (spread(i, count) * 100.0).round())
}

// ============================================================================
// Strategies
// ============================================================================

/// Palette strategies used when no base color is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Neighbouring hues 30° apart.
    Analogous,
    /// Alternating between a hue and its opposite.
    Complementary,
    /// One hue, stepped saturation and lightness.
    Monochromatic,
    /// Independent saturated hues.
    Vibrant,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Analogous,
        Strategy::Complementary,
        Strategy::Monochromatic,
        Strategy::Vibrant,
    ];

    pub fn colors<R: Rng + ?Sized>(self, count: usize, rng: &mut R) -> Vec<Color> {
        match self {
            Strategy::Analogous => analogous_colors(count, rng),
            Strategy::Complementary => complementary_colors(count, rng),
            Strategy::Monochromatic => monochromatic_colors(count, rng),
            Strategy::Vibrant => vibrant_colors(count, rng),
        }
    }
}

fn random_hue<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (unit(rng) * 360.0).floor()
}

pub fn analogous_colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Color> {
    let hue = random_hue(rng);
    (0..count)
        .map(|i| {
            let h = (hue + i as f64 * 30.0) % 360.0;
            let s = 60.0 + unit(rng) * 30.0;
            let l = 45.0 + unit(rng) * 20.0;
            hsl_to_hex(h, s, l)
        })
        .collect()
}

pub fn complementary_colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Color> {
    let hue = random_hue(rng);
    (0..count)
        .map(|i| {
            let h = if i % 2 == 0 { hue } else { (hue + 180.0) % 360.0 };
            let s = 65.0 + unit(rng) * 25.0;
            let l = 50.0 + unit(rng) * 15.0;
            hsl_to_hex(h, s, l)
        })
        .collect()
}

pub fn monochromatic_colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Color> {
    let hue = random_hue(rng);
    let n = count as f64;
    (0..count)
        .map(|i| {
            let i = i as f64;
            hsl_to_hex(hue, 50.0 + i * (40.0 / n), 35.0 + i * (35.0 / n))
        })
        .collect()
}

pub fn vibrant_colors<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Color> {
    (0..count)
        .map(|_| {
            let h = random_hue(rng);
            let s = 70.0 + unit(rng) * 25.0;
            let l = 45.0 + unit(rng) * 20.0;
            hsl_to_hex(h, s, l)
        })
        .collect()
}

/// A single pleasant mid-saturation color with an arbitrary hue.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let h = unit(rng) * 360.0;
    let s = 60.0 + unit(rng) * 30.0;
    let l = 45.0 + unit(rng) * 20.0;
    hsl_to_hex(h, s, l)
}

// ============================================================================
// Base-color generators
// ============================================================================

/// A gray ramp (saturation 0) derived from a base lightness.
///
/// Dark bases (`l < 20`) ramp up to 70, light bases (`l > 80`) ramp from 30,
/// anything else spans ±30 around the base within `[10, 90]`.
pub fn grayscale_colors(count: usize, base_lightness: f64) -> Vec<Color> {
    let (min, max) = if base_lightness < 20.0 {
        (base_lightness, 70.0)
    } else if base_lightness > 80.0 {
        (30.0, base_lightness)
    } else {
        ((base_lightness - 30.0).max(10.0), (base_lightness + 30.0).min(90.0))
    };

    let range = max - min;
    (0..count)
        .map(|i| hsl_to_hex(0.0, 0.0, min + spread(i, count) * range))
        .collect()
}

/// Colors from the same hue family as `base`.
///
/// Hue wanders ±5°, saturation ±15 (kept in `[30, 100]`), and lightness is
/// spread ±20 across the stops (kept in `[25, 75]`).
pub fn same_hue_colors<R: Rng + ?Sized>(count: usize, base: Hsl, rng: &mut R) -> Vec<Color> {
    (0..count)
        .map(|i| {
            let h = (base.h + (unit(rng) * 10.0 - 5.0) + 360.0) % 360.0;
            let s = (base.s + (unit(rng) * 30.0 - 15.0)).clamp(30.0, 100.0);
            let l = (base.l + (spread(i, count) * 40.0 - 20.0)).clamp(25.0, 75.0);
            hsl_to_hex(h, s, l)
        })
        .collect()
}

/// Grayscale ramp for near-gray bases, same-hue family otherwise.
pub fn base_colors<R: Rng + ?Sized>(count: usize, base: Color, rng: &mut R) -> Vec<Color> {
    let hsl = hex_to_hsl(base);
    if hsl.s < GRAYSCALE_SATURATION {
        grayscale_colors(count, hsl.l)
    } else {
        same_hue_colors(count, hsl, rng)
    }
}

// ============================================================================
// Styles
// ============================================================================

/// A color and percent position produced by a generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopSeed {
    pub color: Color,
    pub position: f64,
}

impl StopSeed {
    pub fn new(color: Color, position: f64) -> Self {
        Self { color, position }
    }
}

/// Named gradient presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum GradientStyle {
    /// Two stops at the ends.
    Smooth,
    /// A light band across the middle.
    Glossy,
    /// Three highly saturated stops.
    Vibrant,
    /// Two or three low-contrast stops.
    Subtle,
}

/// Generates the stops for `style`, optionally anchored on `base`.
pub fn style_stops<R: Rng + ?Sized>(
    style: GradientStyle,
    base: Option<Color>,
    rng: &mut R,
) -> Vec<StopSeed> {
    match style {
        GradientStyle::Smooth => {
            let colors = match base {
                Some(base) => base_colors(2, base, rng),
                None => vec![random_color(rng), random_color(rng)],
            };
            vec![StopSeed::new(colors[0], 0.0), StopSeed::new(colors[1], 100.0)]
        }
        GradientStyle::Glossy => {
            let count = if unit(rng) > 0.5 { 3 } else { 4 };
            let colors = match base {
                Some(base) => base_colors(count, base, rng),
                None => (0..count).map(|_| random_color(rng)).collect(),
            };
            if count == 3 {
                vec![
                    StopSeed::new(adjust_lightness(colors[0], -15.0), 0.0),
                    StopSeed::new(adjust_lightness(colors[1], 20.0), 50.0),
                    StopSeed::new(adjust_lightness(colors[2], -15.0), 100.0),
                ]
            } else {
                vec![
                    StopSeed::new(colors[0], 0.0),
                    StopSeed::new(adjust_lightness(colors[1], 25.0), 35.0),
                    StopSeed::new(adjust_lightness(colors[2], 15.0), 65.0),
                    StopSeed::new(colors[3], 100.0),
                ]
            }
        }
        GradientStyle::Vibrant => {
            let colors: Vec<Color> = match base.map(hex_to_hsl) {
                Some(hsl) if hsl.s < GRAYSCALE_SATURATION => {
                    // Gray cannot be made vibrant, so pick a hue for it.
                    let hue = unit(rng) * 360.0;
                    (0..3)
                        .map(|i| hsl_to_hex(hue, 80.0 + unit(rng) * 15.0, 40.0 + i as f64 * 15.0))
                        .collect()
                }
                Some(hsl) => same_hue_colors(3, hsl, rng)
                    .into_iter()
                    .map(|c| adjust_saturation(c, 30.0))
                    .collect(),
                None => (0..3)
                    .map(|_| adjust_saturation(random_color(rng), 25.0))
                    .collect(),
            };
            colors
                .into_iter()
                .zip([0.0, 50.0, 100.0])
                .map(|(color, position)| StopSeed::new(color, position))
                .collect()
        }
        GradientStyle::Subtle => {
            let count = if unit(rng) > 0.6 { 3 } else { 2 };
            let colors: Vec<Color> = match base.map(hex_to_hsl) {
                Some(hsl) => (0..count)
                    .map(|i| {
                        let delta = spread(i, count) * 20.0 - 10.0;
                        hsl_to_hex(hsl.h, (hsl.s - 15.0).max(5.0), (hsl.l + delta).clamp(20.0, 80.0))
                    })
                    .collect(),
                None => {
                    let hue = unit(rng) * 360.0;
                    (0..count)
                        .map(|i| hsl_to_hex(hue, 30.0 + unit(rng) * 20.0, 45.0 + i as f64 * 15.0))
                        .collect()
                }
            };
            colors
                .into_iter()
                .zip(even_positions(count))
                .map(|(color, position)| StopSeed::new(color, position))
                .collect()
        }
    }
}

// ============================================================================
// Random gradients
// ============================================================================

/// A complete randomly generated background.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomGradient {
    pub shape: Shape,
    pub angle: f64,
    pub stops: Vec<StopSeed>,
    /// The strategy used, or `None` when the stops came from a base color.
    pub strategy: Option<Strategy>,
}

/// Generates shape, angle and two to four evenly spaced stops.
///
/// Linear gradients are favoured 70/30 over radial ones, and 70% of angles
/// come from [`COMMON_ANGLES`].
pub fn random_gradient<R: Rng + ?Sized>(base: Option<Color>, rng: &mut R) -> RandomGradient {
    let shape = if unit(rng) > 0.3 { Shape::Linear } else { Shape::Radial };
    let angle = if unit(rng) > 0.3 {
        COMMON_ANGLES[pick(rng, COMMON_ANGLES.len())]
    } else {
        (unit(rng) * 360.0).floor()
    };
    let count = pick(rng, 3) + 2;

    let (colors, strategy) = match base {
        Some(base) => (base_colors(count, base, rng), None),
        None => {
            let strategy = Strategy::ALL[pick(rng, Strategy::ALL.len())];
            (strategy.colors(count, rng), Some(strategy))
        }
    };
    trace!(?shape, angle, count, ?strategy, "generated random gradient");

    let stops = colors
        .into_iter()
        .zip(even_positions(count))
        .map(|(color, position)| StopSeed::new(color, position))
        .collect();

    RandomGradient {
        shape,
        angle,
        stops,
        strategy,
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Editable gradient model.
//!
//! A [`GradientModel`] keeps its stops in insertion order so editing UIs stay
//! stable while stops are dragged past each other. Everything that paints
//! uses [`GradientModel::sorted_stops`] instead, which orders by position and
//! keeps insertion order among equal positions.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::error::Error;
use crate::scheme::{self, GradientStyle, StopSeed};

/// A gradient never holds fewer stops than this.
pub const MIN_STOPS: usize = 2;

// ============================================================================
// Shape
// ============================================================================

/// How the gradient is laid over the tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Shape {
    /// Along a line through the center at the gradient angle.
    #[default]
    Linear,
    /// Outwards from the center.
    Radial,
}

impl Shape {
    /// The other shape, for a two-state toggle.
    pub fn toggled(self) -> Self {
        match self {
            Shape::Linear => Shape::Radial,
            Shape::Radial => Shape::Linear,
        }
    }
}

// ============================================================================
// ColorStop
// ============================================================================

/// Opaque identifier of a stop, unique within its gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(u32);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stop-{}", self.0)
    }
}

/// One anchor of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub id: StopId,
    pub color: Color,
    /// Percentage along the gradient axis, `0..=100`.
    pub position: f64,
}

// ============================================================================
// GradientModel
// ============================================================================

/// The background gradient: shape, angle and at least two color stops.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientModel {
    shape: Shape,
    angle: f64,
    stops: Vec<ColorStop>,
    next_id: u32,
}

impl Default for GradientModel {
    /// Red, green and blue at 0/50/100%, linear at 135°.
    fn default() -> Self {
        Self::preset(
            Shape::Linear,
            135.0,
            [Color::rgb(0xff, 0, 0), Color::rgb(0, 0xff, 0), Color::rgb(0, 0, 0xff)],
        )
    }
}

impl GradientModel {
    /// The warm orange-to-teal gradient used when resetting the whole tile.
    pub fn sunset() -> Self {
        Self::preset(
            Shape::Linear,
            135.0,
            [
                Color::rgb(0xff, 0x7a, 0x18),
                Color::rgb(0xff, 0xb3, 0x47),
                Color::rgb(0x44, 0xb0, 0xb9),
            ],
        )
    }

    fn preset(shape: Shape, angle: f64, colors: [Color; 3]) -> Self {
        let mut model = Self {
            shape,
            angle,
            stops: Vec::with_capacity(colors.len()),
            next_id: 0,
        };
        for (color, position) in colors.into_iter().zip([0.0, 50.0, 100.0]) {
            model.push(color, position);
        }
        model
    }

    /// Builds a gradient from external data such as a saved profile.
    ///
    /// Positions are clamped to `0..=100`; fewer than [`MIN_STOPS`] stops is
    /// rejected.
    pub fn from_stops(
        shape: Shape,
        angle: f64,
        stops: impl IntoIterator<Item = (Color, f64)>,
    ) -> Result<Self, Error> {
        let mut model = Self {
            shape,
            angle: normalize_angle(angle),
            stops: Vec::new(),
            next_id: 0,
        };
        for (color, position) in stops {
            model.push(color, position);
        }
        if model.stops.len() < MIN_STOPS {
            return Err(Error::StopFloor);
        }
        Ok(model)
    }

    fn push(&mut self, color: Color, position: f64) -> StopId {
        let id = StopId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.stops.push(ColorStop {
            id,
            color,
            position: clamp_position(position),
        });
        id
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Angle in degrees, `0..360`. Only meaningful for [`Shape::Linear`].
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Stops in insertion order.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn stop(&self, id: StopId) -> Option<&ColorStop> {
        self.stops.iter().find(|s| s.id == id)
    }

    fn stop_mut(&mut self, id: StopId) -> Result<&mut ColorStop, Error> {
        self.stops
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::UnknownStop(id))
    }

    /// Stops ordered by position, ties in insertion order.
    ///
    /// This is the order every renderer must use.
    pub fn sorted_stops(&self) -> Vec<ColorStop> {
        let mut sorted = self.stops.clone();
        // `sort_by` is stable, which keeps ties in insertion order.
        sorted.sort_by(|a, b| a.position.total_cmp(&b.position));
        sorted
    }

    /// Appends a stop. The position is clamped to `0..=100`.
    pub fn add_stop(&mut self, color: Color, position: f64) -> StopId {
        self.push(color, position)
    }

    /// Removes a stop, refusing to go below [`MIN_STOPS`].
    ///
    /// On error the gradient is left untouched.
    pub fn remove_stop(&mut self, id: StopId) -> Result<ColorStop, Error> {
        let index = self
            .stops
            .iter()
            .position(|s| s.id == id)
            .ok_or(Error::UnknownStop(id))?;
        if self.stops.len() <= MIN_STOPS {
            debug!(%id, "refusing to remove stop below the minimum");
            return Err(Error::StopFloor);
        }
        Ok(self.stops.remove(index))
    }

    pub fn set_stop_color(&mut self, id: StopId, color: Color) -> Result<(), Error> {
        self.stop_mut(id)?.color = color;
        Ok(())
    }

    /// Moves a stop. The position is rounded to a whole percent and clamped.
    pub fn set_stop_position(&mut self, id: StopId, position: f64) -> Result<(), Error> {
        self.stop_mut(id)?.position = clamp_position(position.round());
        Ok(())
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    /// Sets the angle, normalized into `0..360`.
    pub fn set_angle(&mut self, degrees: f64) {
        self.angle = normalize_angle(degrees);
    }

    /// Replaces every stop with freshly identified ones, keeping shape and angle.
    ///
    /// Lists shorter than [`MIN_STOPS`] are refused.
    pub fn replace_stops(&mut self, seeds: &[StopSeed]) -> Result<(), Error> {
        if seeds.len() < MIN_STOPS {
            return Err(Error::StopFloor);
        }
        self.fill_stops(seeds);
        Ok(())
    }

    fn fill_stops(&mut self, seeds: &[StopSeed]) {
        debug_assert!(seeds.len() >= MIN_STOPS, "generated gradients keep the stop floor");
        self.stops.clear();
        for seed in seeds {
            self.push(seed.color, seed.position);
        }
    }

    /// Replaces the stops with a named style preset. Shape and angle are kept.
    pub fn apply_style<R: Rng + ?Sized>(
        &mut self,
        style: GradientStyle,
        base: Option<Color>,
        rng: &mut R,
    ) {
        let seeds = scheme::style_stops(style, base, rng);
        debug!(?style, ?base, stops = seeds.len(), "applying gradient style");
        self.fill_stops(&seeds);
    }

    /// Replaces shape, angle and stops with a random gradient.
    pub fn randomize<R: Rng + ?Sized>(&mut self, base: Option<Color>, rng: &mut R) {
        let generated = scheme::random_gradient(base, rng);
        self.shape = generated.shape;
        self.angle = normalize_angle(generated.angle);
        self.fill_stops(&generated.stops);
    }

    /// CSS form of the gradient, built from [`sorted_stops`](Self::sorted_stops).
    ///
    /// ```
    /// use appicon_renderer::GradientModel;
    ///
    /// assert_eq!(
    ///     GradientModel::default().to_css(),
    ///     "linear-gradient(135deg, #ff0000 0%, #00ff00 50%, #0000ff 100%)"
    /// );
    /// ```
    pub fn to_css(&self) -> String {
        let stops = self
            .sorted_stops()
            .iter()
            .map(|s| format!("{} {}%", s.color, s.position))
            .collect::<Vec<_>>()
            .join(", ");
        match self.shape {
            Shape::Radial => format!("radial-gradient(circle, {stops})"),
            Shape::Linear => format!("linear-gradient({}deg, {stops})", self.angle),
        }
    }
}

impl fmt::Display for GradientModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Textual gradient for non-bitmap previews.
pub fn to_css_gradient_string(gradient: &GradientModel) -> String {
    gradient.to_css()
}

fn clamp_position(position: f64) -> f64 {
    if position.is_nan() {
        0.0
    } else {
        // `+ 0.0` maps -0.0 to 0.0
        position.clamp(0.0, 100.0) + 0.0
    }
}

fn normalize_angle(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    // Tiny negative inputs round up to exactly 360.
    let normalized = degrees.rem_euclid(360.0) + 0.0;
    if normalized >= 360.0 { 0.0 } else { normalized }
}

// ============================================================================
// Tests
// ============================================================================

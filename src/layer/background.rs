//! Gradient fill and the rounded clip for the tile background.

use std::f32::consts::SQRT_2;

use resvg::tiny_skia::{
    FillRule, GradientStop, LinearGradient, Mask, Path, PathBuilder, Point, RadialGradient, Rect,
    Shader, SpreadMode, Transform,
};
use tracing::debug;

use crate::color::Color;
use crate::gradient::{GradientModel, Shape};

/// Control point distance for a cubic quarter circle of unit radius.
pub const KAPPA: f32 = 0.552_284_7;

// ============================================================================
// GradientFill
// ============================================================================

/// A stop placed along the gradient axis, with `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStop {
    pub offset: f32,
    pub color: Color,
}

/// Surface-space gradient geometry for one tile size.
///
/// Stops always come from [`GradientModel::sorted_stops`], so the order and
/// positions match [`GradientModel::to_css`] exactly.
#[derive(Debug, Clone, PartialEq)]
pub enum GradientFill {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<FillStop>,
    },
    Radial {
        center: Point,
        radius: f32,
        stops: Vec<FillStop>,
    },
}

impl GradientFill {
    /// Lays out `gradient` on a square surface of `size` pixels.
    ///
    /// Linear gradients run through the center along `(cos θ, sin θ)` and
    /// extend `size / 2 · √2` each way, so the axis covers the full square at
    /// any angle. Radial gradients are centered with radius `size / 2`.
    pub fn from_model(gradient: &GradientModel, size: u32) -> Self {
        let half = size as f32 / 2.0;
        let center = Point::from_xy(half, half);
        let stops = gradient
            .sorted_stops()
            .into_iter()
            .map(|stop| FillStop {
                offset: (stop.position / 100.0).clamp(0.0, 1.0) as f32,
                color: stop.color,
            })
            .collect();

        match gradient.shape() {
            Shape::Radial => Self::Radial {
                center,
                radius: half,
                stops,
            },
            Shape::Linear => {
                let theta = (gradient.angle() as f32).to_radians();
                let (dy, dx) = theta.sin_cos();
                let reach = half * SQRT_2;
                Self::Linear {
                    start: Point::from_xy(half - dx * reach, half - dy * reach),
                    end: Point::from_xy(half + dx * reach, half + dy * reach),
                    stops,
                }
            }
        }
    }

    pub fn stops(&self) -> &[FillStop] {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } => stops,
        }
    }

    /// Builds the paint shader.
    ///
    /// Degenerate geometry falls back to a solid fill of the first stop.
    pub fn shader(&self) -> Shader<'static> {
        let stops: Vec<GradientStop> = self
            .stops()
            .iter()
            .map(|s| GradientStop::new(s.offset, s.color.to_skia()))
            .collect();
        let fallback = self
            .stops()
            .first()
            .map_or(Color::BLACK, |s| s.color)
            .to_skia();

        let shader = match *self {
            Self::Linear { start, end, .. } => LinearGradient::new(
                start,
                end,
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            ),
            Self::Radial { center, radius, .. } => RadialGradient::new(
                center,
                center,
                radius,
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            ),
        };

        shader.unwrap_or_else(|| {
            debug!("degenerate gradient geometry, using a solid fill");
            Shader::SolidColor(fallback)
        })
    }
}

// ============================================================================
// Clip
// ============================================================================

/// A square of edge `size` with corners rounded by `radius`.
///
/// `radius` is clamped to `[0, size / 2]`. A zero radius yields the plain
/// square; otherwise each corner is a cubic quarter arc.
pub fn rounded_rect_path(size: f32, radius: f32) -> Option<Path> {
    let s = size;
    let r = if radius.is_nan() {
        0.0
    } else {
        radius.clamp(0.0, s / 2.0)
    };
    if r <= 0.0 {
        return Rect::from_xywh(0.0, 0.0, s, s).map(PathBuilder::from_rect);
    }

    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(r, 0.0);
    pb.line_to(s - r, 0.0);
    pb.cubic_to(s - r + k, 0.0, s, r - k, s, r);
    pb.line_to(s, s - r);
    pb.cubic_to(s, s - r + k, s - r + k, s, s - r, s);
    pb.line_to(r, s);
    pb.cubic_to(r - k, s, 0.0, s - r + k, 0.0, s - r);
    pb.line_to(0.0, r);
    pb.cubic_to(0.0, r - k, r - k, 0.0, r, 0.0);
    pb.close();
    pb.finish()
}

/// Anti-aliased coverage mask for the rounded tile.
pub fn clip_mask(size: u32, radius: f32) -> Option<Mask> {
    let path = rounded_rect_path(size as f32, radius)?;
    let mut mask = Mask::new(size, size)?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Some(mask)
}

// ============================================================================
// Tests
// ============================================================================

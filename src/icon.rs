//! Glyph styling, export geometry and pixel rectangles.

use crate::color::Color;

/// Smallest glyph size, as a percentage of the tile edge.
pub const MIN_GLYPH_PERCENT: f64 = 10.0;
/// Largest glyph size, as a percentage of the tile edge.
pub const MAX_GLYPH_PERCENT: f64 = 90.0;

/// A rectangle defined in pixel coordinates.
///
/// The origin may be negative when a glyph is pushed past the tile edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

// ============================================================================
// IconStyle
// ============================================================================

/// How the glyph is tinted and placed on the tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconStyle {
    /// Uniform color applied to every drawable region of the glyph.
    pub tint: Color,
    size_percent: f64,
    /// Vertical shift as a percentage of the tile edge; positive moves down.
    pub vertical_offset_percent: f64,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            tint: Color::WHITE,
            size_percent: 44.0,
            vertical_offset_percent: 0.0,
        }
    }
}

impl IconStyle {
    pub fn new(tint: Color, size_percent: f64, vertical_offset_percent: f64) -> Self {
        Self {
            tint,
            size_percent: clamp_glyph_percent(size_percent),
            vertical_offset_percent,
        }
    }

    /// Glyph edge as a percentage of the tile edge, within `[10, 90]`.
    pub fn size_percent(&self) -> f64 {
        self.size_percent
    }

    pub fn set_size_percent(&mut self, percent: f64) {
        self.size_percent = clamp_glyph_percent(percent);
    }

    /// The square the glyph occupies on a tile of `size` pixels.
    ///
    /// Coordinates are floored to whole pixels: the square is centered
    /// horizontally and centered vertically before the offset is applied.
    pub fn glyph_rect(&self, size: u32) -> RectPx {
        let size = size as f64;
        let edge = (size * clamp_glyph_percent(self.size_percent) / 100.0).floor();
        let x = ((size - edge) / 2.0).floor();
        let offset = (self.vertical_offset_percent / 100.0 * size).floor();
        let y = ((size - edge) / 2.0 + offset).floor();
        RectPx::new(x as i32, y as i32, edge as u32, edge as u32)
    }
}

fn clamp_glyph_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        MIN_GLYPH_PERCENT
    } else {
        percent.clamp(MIN_GLYPH_PERCENT, MAX_GLYPH_PERCENT)
    }
}

// ============================================================================
// ExportSpec
// ============================================================================

/// Output resolution and corner rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportSpec {
    /// Edge of the square output in pixels.
    pub size: u32,
    /// Requested corner radius in pixels; see [`corner_radius`](Self::corner_radius).
    pub corner_radius: f32,
}

impl Default for ExportSpec {
    fn default() -> Self {
        Self {
            size: 256,
            corner_radius: 18.0,
        }
    }
}

impl ExportSpec {
    pub fn new(size: u32, corner_radius: f32) -> Self {
        Self { size, corner_radius }
    }

    /// The output edge actually painted; a zero size paints a single pixel.
    pub fn surface_size(&self) -> u32 {
        self.size.max(1)
    }

    /// The corner radius clamped to `[0, size / 2]`.
    pub fn corner_radius(&self) -> f32 {
        let half = self.surface_size() as f32 / 2.0;
        if self.corner_radius.is_nan() {
            0.0
        } else {
            self.corner_radius.clamp(0.0, half)
        }
    }
}

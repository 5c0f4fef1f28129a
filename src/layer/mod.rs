//! Tile compositing.
//!
//! A tile is painted in three steps, all clipped to a rounded square:
//!
//! ```text
//! ┌──────────────┐
//! │  Background  │ ◄── GradientModel::sorted_stops, shape and angle
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Glyph     │ ◄── RasterSlot::current (skipped when absent)
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Surface    │ ◄── swapped in once painting is done
//! └──────────────┘
//! ```
//!
//! Rasterizing the glyph is asynchronous and lives in [`glyph`]; compositing
//! is synchronous and never fails. Degenerate geometry is clamped.

pub mod background;
pub mod glyph;
pub mod svg;

pub use background::{FillStop, GradientFill};
pub use glyph::{GlyphRaster, RasterKey, RasterSlot, RasterTicket, recolor_and_rasterize};
pub use svg::{GlyphDocument, GlyphId, SvgSource, recolor_svg};

use image::RgbaImage;
use resvg::tiny_skia::{
    FilterQuality, Mask, Paint, Pixmap, PixmapPaint, PremultipliedColorU8, Rect, Transform,
};
use tracing::{debug, warn};

use crate::gradient::GradientModel;
use crate::icon::{ExportSpec, IconStyle};

// ============================================================================
// Surface
// ============================================================================

/// The output bitmap a tile is composited into.
///
/// Empty until the first [`render`]. Observers only ever see a finished
/// frame: each render paints a new pixmap and replaces the old one at the end.
#[derive(Debug, Default)]
pub struct Surface {
    pixmap: Option<Pixmap>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edge length of the last rendered frame.
    pub fn size(&self) -> Option<u32> {
        self.pixmap.as_ref().map(Pixmap::width)
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Premultiplied pixel of the last frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremultipliedColorU8> {
        self.pixmap.as_ref()?.pixel(x, y)
    }

    /// Copies the last frame into an unpremultiplied RGBA image.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        self.pixmap.as_ref().and_then(pixmap_to_rgba_image)
    }

    fn replace(&mut self, pixmap: Pixmap) {
        self.pixmap = Some(pixmap);
    }
}

fn pixmap_to_rgba_image(pixmap: &Pixmap) -> Option<RgbaImage> {
    // tiny_skia stores premultiplied alpha
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
}

// ============================================================================
// Render
// ============================================================================

/// Composites a tile into `surface`.
///
/// The surface is resized to `export.surface_size()`, the rounded clip is
/// applied, the gradient fills the clip, and `raster` (if any) is scaled into
/// [`IconStyle::glyph_rect`]. A missing raster just means no glyph is drawn.
pub fn render(
    surface: &mut Surface,
    gradient: &GradientModel,
    style: &IconStyle,
    export: &ExportSpec,
    raster: Option<&GlyphRaster>,
) {
    if export.size == 0 {
        debug!("output size 0 clamped to 1");
    }
    let size = export.surface_size();
    match paint_tile(size, gradient, style, export, raster) {
        Some(pixmap) => surface.replace(pixmap),
        None => warn!(size, "unable to allocate output surface, keeping previous frame"),
    }
}

fn paint_tile(
    size: u32,
    gradient: &GradientModel,
    style: &IconStyle,
    export: &ExportSpec,
    raster: Option<&GlyphRaster>,
) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(size, size)?;
    let mask = background::clip_mask(size, export.corner_radius())?;
    let bounds = Rect::from_xywh(0.0, 0.0, size as f32, size as f32)?;

    let mut paint = Paint::default();
    paint.shader = GradientFill::from_model(gradient, size).shader();
    pixmap.fill_rect(bounds, &paint, Transform::identity(), Some(&mask));

    if let Some(raster) = raster {
        draw_glyph(&mut pixmap, raster, style, &mask);
    }

    Some(pixmap)
}

fn draw_glyph(pixmap: &mut Pixmap, raster: &GlyphRaster, style: &IconStyle, mask: &Mask) {
    let rect = style.glyph_rect(pixmap.width());
    if rect.width == 0 || raster.width() == 0 || raster.height() == 0 {
        debug!("glyph region is empty, skipping glyph");
        return;
    }

    let sx = rect.width as f32 / raster.width() as f32;
    let sy = rect.height as f32 / raster.height() as f32;
    let transform = Transform::from_scale(sx, sy).post_translate(rect.x as f32, rect.y as f32);
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..Default::default()
    };
    pixmap.draw_pixmap(0, 0, raster.pixmap().as_ref(), &paint, transform, Some(mask));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::gradient::Shape;

    fn white_raster() -> GlyphRaster {
        let mut pixmap = Pixmap::new(256, 256).unwrap();
        pixmap.fill(resvg::tiny_skia::Color::WHITE);
        GlyphRaster::new(RasterKey::new(GlyphId::from("solid"), Color::WHITE), pixmap)
    }

    fn is_white(surface: &Surface, x: u32, y: u32) -> bool {
        let px = surface.pixel(x, y).unwrap();
        [px.red(), px.green(), px.blue(), px.alpha()]
            .iter()
            .all(|&c| c >= 250)
    }

    #[test]
    fn oversized_radius_is_clamped() {
        let mut surface = Surface::new();
        let export = ExportSpec::new(256, 300.0);
        render(
            &mut surface,
            &GradientModel::default(),
            &IconStyle::default(),
            &export,
            None,
        );

        assert_eq!(surface.size(), Some(256));
        assert_eq!(surface.pixel(0, 0).unwrap().alpha(), 0);
        assert_eq!(surface.pixel(128, 128).unwrap().alpha(), 255);
        // The clip is a circle: the middle of each edge is still painted.
        assert_eq!(surface.pixel(128, 1).unwrap().alpha(), 255);
    }

    #[test]
    fn zero_radius_keeps_corners() {
        let mut surface = Surface::new();
        render(
            &mut surface,
            &GradientModel::default(),
            &IconStyle::default(),
            &ExportSpec::new(64, 0.0),
            None,
        );
        assert_eq!(surface.pixel(0, 0).unwrap().alpha(), 255);
        assert_eq!(surface.pixel(63, 63).unwrap().alpha(), 255);
    }

    #[test]
    fn zero_size_renders_one_pixel() {
        let mut surface = Surface::new();
        render(
            &mut surface,
            &GradientModel::default(),
            &IconStyle::default(),
            &ExportSpec::new(0, 18.0),
            Some(&white_raster()),
        );
        assert_eq!(surface.size(), Some(1));
    }

    #[test]
    fn surface_follows_export_size() {
        let mut surface = Surface::new();
        assert!(surface.size().is_none());
        assert!(surface.to_rgba_image().is_none());

        let gradient = GradientModel::default();
        let style = IconStyle::default();
        render(&mut surface, &gradient, &style, &ExportSpec::new(64, 8.0), None);
        render(&mut surface, &gradient, &style, &ExportSpec::new(32, 8.0), None);
        assert_eq!(surface.size(), Some(32));
    }

    #[test]
    fn glyph_is_drawn_in_its_region() {
        let mut surface = Surface::new();
        let style = IconStyle::new(Color::WHITE, 50.0, 0.0);
        render(
            &mut surface,
            &GradientModel::default(),
            &style,
            &ExportSpec::new(256, 0.0),
            Some(&white_raster()),
        );

        // Region is (64, 64) to (192, 192).
        assert!(is_white(&surface, 128, 128));
        assert!(is_white(&surface, 70, 70));
        assert!(is_white(&surface, 186, 186));
        assert!(!is_white(&surface, 40, 128));
        assert!(!is_white(&surface, 128, 220));
    }

    #[test]
    fn glyph_offset_moves_region() {
        let mut surface = Surface::new();
        let style = IconStyle::new(Color::WHITE, 50.0, 25.0);
        render(
            &mut surface,
            &GradientModel::default(),
            &style,
            &ExportSpec::new(256, 0.0),
            Some(&white_raster()),
        );

        // Region is (64, 128) to (192, 256).
        assert!(!is_white(&surface, 128, 100));
        assert!(is_white(&surface, 128, 200));
        assert!(is_white(&surface, 128, 250));
    }

    #[test]
    fn missing_raster_draws_background_only() {
        let mut surface = Surface::new();
        let mut gradient = GradientModel::default();
        gradient.set_shape(Shape::Radial);
        render(
            &mut surface,
            &gradient,
            &IconStyle::new(Color::WHITE, 90.0, 0.0),
            &ExportSpec::new(64, 0.0),
            None,
        );
        let px = surface.pixel(32, 32).unwrap();
        assert!(px.red() > 200 && px.blue() < 30);
    }

    #[test]
    fn rgba_export_is_unpremultiplied() {
        let mut surface = Surface::new();
        let gradient = GradientModel::from_stops(
            Shape::Linear,
            0.0,
            [(Color::rgb(0, 128, 255), 0.0), (Color::rgb(0, 128, 255), 100.0)],
        )
        .unwrap();
        render(
            &mut surface,
            &gradient,
            &IconStyle::default(),
            &ExportSpec::new(32, 0.0),
            None,
        );

        let image = surface.to_rgba_image().unwrap();
        assert_eq!(image.dimensions(), (32, 32));
        assert_eq!(image.get_pixel(5, 5).0, [0, 128, 255, 255]);
    }
}

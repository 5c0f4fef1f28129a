//! Icon design state and the render entry points.

use image::RgbaImage;
use rand::Rng;
use tracing::debug;

use crate::color::Color;
use crate::error::{Error, RasterError};
use crate::gradient::GradientModel;
use crate::icon::{ExportSpec, IconStyle};
use crate::layer::{
    self, GlyphDocument, GlyphRaster, RasterKey, RasterSlot, RasterTicket, Surface,
    recolor_and_rasterize,
};
use crate::profile::IconProfile;

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from an [`IconProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    ///
    /// Nothing is changed when the profile is rejected.
    fn apply_profile(&mut self, profile: &IconProfile) -> Result<(), Error>;

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> IconProfile;
}

// ============================================================================
// Pending rasters
// ============================================================================

/// A glyph rasterization that has been requested but not yet run.
///
/// Owns everything it needs, so it can be awaited while the composer keeps
/// being edited. Hand the result back with [`IconComposer::accept_raster`].
#[derive(Debug, Clone)]
pub struct PendingRaster {
    ticket: RasterTicket,
    glyph: GlyphDocument,
}

impl PendingRaster {
    pub fn ticket(&self) -> &RasterTicket {
        &self.ticket
    }

    /// Recolors and decodes the glyph.
    pub async fn rasterize(self) -> CompletedRaster {
        let tint = self.ticket.key().tint;
        let result = recolor_and_rasterize(&self.glyph, tint).await;
        CompletedRaster {
            ticket: self.ticket,
            result,
        }
    }
}

/// The outcome of a [`PendingRaster`].
#[derive(Debug)]
pub struct CompletedRaster {
    pub ticket: RasterTicket,
    pub result: Result<GlyphRaster, RasterError>,
}

// ============================================================================
// IconComposer
// ============================================================================

/// Holds an icon design and renders it.
///
/// The gradient, glyph style and export settings are public and edited in
/// place. The glyph raster lives in a [`RasterSlot`] and is refreshed
/// explicitly, so rendering itself never waits.
///
/// # Example
///
/// ```
/// use appicon_renderer::{Color, GlyphDocument, IconComposer};
/// use futures::executor::block_on;
///
/// let mut composer = IconComposer::new();
/// composer.set_glyph(Some(GlyphDocument::new(
///     "dot",
///     r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><circle cx="12" cy="12" r="8"/></svg>"#,
/// )));
/// composer.set_tint(Color::rgb(20, 20, 20));
///
/// block_on(composer.refresh_glyph()).unwrap();
/// let surface = composer.render();
/// assert_eq!(surface.size(), Some(256));
/// ```
#[derive(Debug, Default)]
pub struct IconComposer {
    /// Background gradient.
    pub gradient: GradientModel,

    /// Glyph tint, size and offset.
    pub style: IconStyle,

    /// Output size and corner radius.
    pub export: ExportSpec,

    glyph: Option<GlyphDocument>,
    slot: RasterSlot,
    surface: Surface,
}

impl IconComposer {
    /// Creates a composer with the default design and no glyph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyph(&self) -> Option<&GlyphDocument> {
        self.glyph.as_ref()
    }

    /// Selects the glyph to draw, or none.
    ///
    /// The raster is not refreshed until [`request_glyph_raster`](Self::request_glyph_raster)
    /// or [`refresh_glyph`](Self::refresh_glyph) is called.
    pub fn set_glyph(&mut self, glyph: Option<GlyphDocument>) {
        if glyph.is_none() {
            self.slot.clear();
        }
        self.glyph = glyph;
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.style.tint = tint;
    }

    pub fn raster_slot(&self) -> &RasterSlot {
        &self.slot
    }

    /// The last rendered frame.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Starts a rasterization for the current glyph and tint.
    ///
    /// Returns `None` when there is no glyph or the raster is already
    /// current (or already on its way).
    pub fn request_glyph_raster(&mut self) -> Option<PendingRaster> {
        let glyph = self.glyph.as_ref()?;
        let ticket = self
            .slot
            .request(RasterKey::of(glyph, self.style.tint))?;
        debug!(glyph = %glyph.id.0, tint = %self.style.tint, "requesting glyph raster");
        Some(PendingRaster {
            ticket,
            glyph: glyph.clone(),
        })
    }

    /// Stores a finished rasterization.
    ///
    /// Returns `Ok(false)` if a newer request has superseded it. Failures of
    /// the newest request are returned and leave the composer without a glyph
    /// raster, so the next render draws the background only.
    pub fn accept_raster(&mut self, completed: CompletedRaster) -> Result<bool, Error> {
        let CompletedRaster { ticket, result } = completed;
        match result {
            Ok(raster) => Ok(self.slot.fulfil(&ticket, raster)),
            Err(error) => {
                if self.slot.fail(&ticket, &error) {
                    Err(error.into())
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// Brings the glyph raster up to date with the current glyph and tint.
    pub async fn refresh_glyph(&mut self) -> Result<(), Error> {
        if let Some(pending) = self.request_glyph_raster() {
            let completed = pending.rasterize().await;
            self.accept_raster(completed)?;
        }
        Ok(())
    }

    /// The ready raster, if it matches the current glyph and tint.
    pub fn current_raster(&self) -> Option<&GlyphRaster> {
        matching_raster(&self.slot, self.glyph.as_ref(), self.style.tint)
    }

    /// Composites the current design into the surface.
    ///
    /// A missing or outdated glyph raster draws no glyph.
    pub fn render(&mut self) -> &Surface {
        let raster = matching_raster(&self.slot, self.glyph.as_ref(), self.style.tint);
        layer::render(
            &mut self.surface,
            &self.gradient,
            &self.style,
            &self.export,
            raster,
        );
        &self.surface
    }

    /// Renders and copies the frame into an RGBA image.
    pub fn render_image(&mut self) -> Option<RgbaImage> {
        self.render().to_rgba_image()
    }

    /// Textual gradient for previews outside the bitmap surface.
    pub fn css_preview(&self) -> String {
        self.gradient.to_css()
    }

    /// Replaces the gradient with a randomly generated one.
    ///
    /// The glyph tint is not used as a base; pass `base` to derive from a color.
    pub fn randomize_background<R: Rng + ?Sized>(&mut self, base: Option<Color>, rng: &mut R) {
        self.gradient.randomize(base, rng);
    }

    /// Restores the red, green and blue starting gradient.
    pub fn reset_gradient(&mut self) {
        self.gradient = GradientModel::default();
    }

    /// Restores the sunset gradient and default style and export settings.
    ///
    /// The selected glyph is kept; its raster is dropped.
    pub fn reset_all(&mut self) {
        self.gradient = GradientModel::sunset();
        self.style = IconStyle::default();
        self.export = ExportSpec::default();
        self.slot.clear();
    }
}

fn matching_raster<'a>(
    slot: &'a RasterSlot,
    glyph: Option<&GlyphDocument>,
    tint: Color,
) -> Option<&'a GlyphRaster> {
    let key = RasterKey::of(glyph?, tint);
    slot.current().filter(|raster| *raster.key() == key)
}

impl Configurable for IconComposer {
    /// Applies background, glyph style and export settings.
    ///
    /// # Example
    ///
    /// ```
    /// use appicon_renderer::{Configurable, IconComposer, IconProfile, Shape};
    ///
    /// let mut composer = IconComposer::new();
    /// let json = r##"{
    ///     "background": {
    ///         "type": "radial",
    ///         "angle": 0,
    ///         "stops": [{ "color": "#000000", "pos": 0 }, { "color": "#ffffff", "pos": 100 }]
    ///     }
    /// }"##;
    ///
    /// composer.apply_profile(&IconProfile::from_json(json).unwrap()).unwrap();
    /// assert_eq!(composer.gradient.shape(), Shape::Radial);
    /// ```
    fn apply_profile(&mut self, profile: &IconProfile) -> Result<(), Error> {
        let background = &profile.background;
        let gradient = GradientModel::from_stops(
            background.shape,
            background.angle,
            background.stops.iter().map(|s| (s.color, s.pos)),
        )?;

        self.gradient = gradient;
        self.style = profile.icon_style.into();
        self.export = profile.export.into();
        Ok(())
    }

    fn export_profile(&self) -> IconProfile {
        IconProfile::new()
            .with_background(&self.gradient)
            .with_icon_style(&self.style)
            .with_export(&self.export)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::Shape;
    use crate::profile::StopSettings;
    use futures::executor::block_on;
    use rand::rngs::mock::StepRng;

    const DOT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><circle cx="12" cy="12" r="10"/></svg>"#;

    fn composer_with_glyph() -> IconComposer {
        let mut composer = IconComposer::new();
        composer.set_glyph(Some(GlyphDocument::new("dot", DOT)));
        composer.export = ExportSpec::new(128, 0.0);
        composer.style.set_size_percent(50.0);
        composer
    }

    #[test]
    fn composer_defaults() {
        let composer = IconComposer::new();
        assert!(composer.glyph().is_none());
        assert!(composer.surface().size().is_none());
        assert_eq!(
            composer.css_preview(),
            "linear-gradient(135deg, #ff0000 0%, #00ff00 50%, #0000ff 100%)"
        );
    }

    #[test]
    fn render_without_glyph() {
        let mut composer = IconComposer::new();
        assert!(composer.request_glyph_raster().is_none());
        let image = composer.render_image().unwrap();
        assert_eq!(image.dimensions(), (256, 256));
    }

    #[test]
    fn refresh_then_render_draws_tinted_glyph() {
        let mut composer = composer_with_glyph();
        composer.set_tint(Color::rgb(0, 0, 0));
        block_on(composer.refresh_glyph()).unwrap();
        assert!(composer.raster_slot().current().is_some());

        let px = composer.render().pixel(64, 64).unwrap();
        assert!(px.red() < 5 && px.green() < 5 && px.blue() < 5 && px.alpha() > 250);
    }

    #[test]
    fn refresh_is_memoized() {
        let mut composer = composer_with_glyph();
        block_on(composer.refresh_glyph()).unwrap();
        assert!(composer.request_glyph_raster().is_none());

        composer.set_tint(Color::rgb(1, 2, 3));
        assert!(composer.request_glyph_raster().is_some());
    }

    #[test]
    fn out_of_order_completion_keeps_latest_tint() {
        let mut composer = composer_with_glyph();

        composer.set_tint(Color::rgb(255, 0, 0));
        let first = composer.request_glyph_raster().unwrap();
        composer.set_tint(Color::rgb(0, 0, 255));
        let second = composer.request_glyph_raster().unwrap();

        let second = block_on(second.rasterize());
        let first = block_on(first.rasterize());

        assert!(composer.accept_raster(second).unwrap());
        assert!(!composer.accept_raster(first).unwrap());

        let current = composer.raster_slot().current().unwrap();
        assert_eq!(current.key().tint, Color::rgb(0, 0, 255));

        let px = composer.render().pixel(64, 64).unwrap();
        assert!(px.red() < 5 && px.green() < 5 && px.blue() > 250);
    }

    #[test]
    fn failed_raster_renders_background_only() {
        let mut composer = IconComposer::new();
        composer.set_glyph(Some(GlyphDocument::new("bad", "<html/>")));

        let err = block_on(composer.refresh_glyph()).unwrap_err();
        assert!(matches!(
            err,
            Error::Rasterization(RasterError::NotSvg(_))
        ));
        assert!(composer.raster_slot().current().is_none());
        assert!(composer.render_image().is_some());
    }

    #[test]
    fn clearing_glyph_drops_raster() {
        let mut composer = composer_with_glyph();
        block_on(composer.refresh_glyph()).unwrap();
        composer.set_glyph(None);
        assert!(composer.raster_slot().current().is_none());
        assert!(composer.request_glyph_raster().is_none());
    }

    #[test]
    fn reset_all_restores_defaults() {
        let mut composer = composer_with_glyph();
        composer.gradient.set_shape(Shape::Radial);
        composer.set_tint(Color::BLACK);
        composer.reset_all();

        assert_eq!(composer.gradient, GradientModel::sunset());
        assert_eq!(composer.style, IconStyle::default());
        assert_eq!(composer.export, ExportSpec::default());
        assert!(composer.glyph().is_some());
        assert!(composer.raster_slot().current().is_none());

        composer.reset_gradient();
        assert_eq!(composer.gradient, GradientModel::default());
    }

    #[test]
    fn outdated_raster_is_not_drawn() {
        let mut composer = composer_with_glyph();
        composer.set_tint(Color::rgb(0, 0, 0));
        block_on(composer.refresh_glyph()).unwrap();
        assert!(composer.current_raster().is_some());

        composer.set_tint(Color::WHITE);
        assert!(composer.current_raster().is_none());
        let px = composer.render().pixel(64, 64).unwrap();
        assert_ne!((px.red(), px.green(), px.blue()), (0, 0, 0));
    }

    #[test]
    fn randomize_background_keeps_stop_floor() {
        let mut composer = IconComposer::new();
        composer.randomize_background(None, &mut StepRng::new(0, 0));
        assert!(composer.gradient.len() >= 2);
    }

    #[test]
    fn profile_roundtrip_through_composer() {
        let mut composer = IconComposer::new();
        composer.gradient = GradientModel::sunset();
        composer.style = IconStyle::new(Color::rgb(10, 20, 30), 60.0, 5.0);
        composer.export = ExportSpec::new(512, 40.0);

        let profile = composer.export_profile();
        let mut other = IconComposer::new();
        other.apply_profile(&profile).unwrap();

        assert_eq!(other.export_profile(), profile);
        assert_eq!(other.css_preview(), composer.css_preview());
    }

    #[test]
    fn rejected_profile_changes_nothing() {
        let mut composer = IconComposer::new();
        let mut profile = IconProfile::new().with_export(&ExportSpec::new(64, 0.0));
        profile.background.stops = vec![StopSettings {
            color: Color::WHITE,
            pos: 0.0,
        }];

        assert!(matches!(
            composer.apply_profile(&profile),
            Err(Error::StopFloor)
        ));
        assert_eq!(composer.export, ExportSpec::default());
        assert_eq!(composer.gradient, GradientModel::default());
    }
}

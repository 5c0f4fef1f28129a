//! appicon-renderer: App icon tiles from a gradient and a tinted glyph
//!
//! This crate composes square app icons: a rounded tile filled with a linear
//! or radial gradient, with a single-color vector glyph drawn on top. It
//! also generates harmonious gradients from color-theory rules.
//!
//! # Example
//!
//! ```
//! use appicon_renderer::{Color, GradientModel, IconComposer, Shape};
//!
//! let mut composer = IconComposer::new();
//!
//! // Edit the background in place
//! let id = composer.gradient.add_stop(Color::rgb(0xff, 0xff, 0xff), 25.0);
//! composer.gradient.set_stop_position(id, 75.4).unwrap();
//! composer.gradient.set_shape(Shape::Radial);
//!
//! assert_eq!(
//!     composer.css_preview(),
//!     "radial-gradient(circle, #ff0000 0%, #00ff00 50%, #ffffff 75%, #0000ff 100%)"
//! );
//!
//! let image = composer.render_image().unwrap();
//! assert_eq!(image.dimensions(), (256, 256));
//! ```
//!
//! # Generated Gradients
//!
//! Gradients can be generated from a base color and a style, or picked at
//! random. Any [`rand::Rng`] works, so seeded generators give repeatable
//! results:
//!
//! ```
//! use appicon_renderer::{Color, GradientModel, GradientStyle};
//! use rand::rngs::mock::StepRng;
//!
//! let mut gradient = GradientModel::default();
//! let mut rng = StepRng::new(0, 0);
//!
//! gradient.apply_style(GradientStyle::Subtle, Some(Color::rgb(0x33, 0x66, 0xcc)), &mut rng);
//! assert_eq!(gradient.len(), 2);
//! ```
//!
//! # Serializable Profiles
//!
//! Designs round-trip through [`IconProfile`] with the [`Configurable`] trait:
//!
//! ```
//! use appicon_renderer::{Configurable, IconComposer, IconProfile};
//!
//! let mut composer = IconComposer::new();
//! composer.gradient = appicon_renderer::GradientModel::sunset();
//!
//! let json = composer.export_profile().to_json().unwrap();
//!
//! let mut restored = IconComposer::new();
//! restored.apply_profile(&IconProfile::from_json(&json).unwrap()).unwrap();
//! assert_eq!(restored.css_preview(), composer.css_preview());
//! ```

mod color;
mod composer;
mod error;
mod gradient;
mod icon;
mod layer;
mod profile;
mod scheme;

pub use color::{Color, Hsl, adjust_lightness, adjust_saturation, hex_to_hsl, hsl_to_hex};
pub use composer::{CompletedRaster, Configurable, IconComposer, PendingRaster};
pub use error::{Error, RasterError};
pub use gradient::{
    ColorStop, GradientModel, MIN_STOPS, Shape, StopId, to_css_gradient_string,
};
pub use icon::{ExportSpec, IconStyle, MAX_GLYPH_PERCENT, MIN_GLYPH_PERCENT, RectPx};
pub use layer::{
    FillStop, GlyphDocument, GlyphId, GlyphRaster, GradientFill, RasterKey, RasterSlot,
    RasterTicket, Surface, SvgSource, recolor_and_rasterize, recolor_svg, render,
};
pub use layer::background::{clip_mask, rounded_rect_path};
pub use layer::svg::{GLYPH_RENDER_SIZE, decode_svg};
pub use profile::{
    BackgroundSettings, ExportSettings, IconProfile, IconStyleSettings, StopSettings,
};
pub use scheme::{
    GradientStyle, RandomGradient, StopSeed, Strategy, analogous_colors, base_colors,
    complementary_colors, grayscale_colors, monochromatic_colors, random_color, random_gradient,
    same_hue_colors, style_stops, vibrant_colors,
};

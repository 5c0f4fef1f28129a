//! Error types shared across the crate.

use thiserror::Error;

use crate::gradient::{MIN_STOPS, StopId};

/// Errors raised at the editing boundary.
///
/// Color-space and palette functions never return these; they assume
/// well-formed input. Drawing never fails either: degenerate geometry is
/// clamped instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A color string was not `#rrggbb` (the `#` is optional).
    #[error("invalid color {0:?}: expected six hex digits")]
    InvalidColor(String),

    /// Removing a stop would leave the gradient with fewer than two stops.
    #[error("a gradient must keep at least {} stops", MIN_STOPS)]
    StopFloor,

    /// The referenced stop does not exist in this gradient.
    #[error("no stop with id {0}")]
    UnknownStop(StopId),

    /// The glyph could not be recolored or decoded.
    #[error("glyph rasterization failed: {0}")]
    Rasterization(#[from] RasterError),
}

/// Failures while turning a glyph document into a bitmap.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The glyph source did not resolve to SVG markup (e.g. an unknown emoji).
    #[error("glyph source has no SVG markup")]
    MissingSource,

    /// The markup is not well-formed XML.
    #[error("malformed glyph document: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The root element is not `<svg>`.
    #[error("glyph document root is <{0}>, expected <svg>")]
    NotSvg(String),

    /// resvg could not build a render tree from the recolored document.
    #[error("could not decode glyph: {0}")]
    Decode(#[from] resvg::usvg::Error),

    /// The decoded document has no drawable area.
    #[error("glyph decoded to an empty {0}x{1} bitmap")]
    EmptyPixmap(u32, u32),
}

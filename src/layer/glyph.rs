//! Glyph rasters and the single-slot raster memo.
//!
//! Rasterizing is the only asynchronous step in producing a tile. A new tint
//! or glyph can be chosen while an older rasterization is still running, so
//! results are accepted through [`RasterSlot`], which only keeps the result
//! of the most recent request. Older results are dropped when they arrive.

use resvg::tiny_skia::Pixmap;
use tracing::{debug, warn};

use super::svg::{GlyphDocument, GlyphId, decode_svg};
use crate::color::Color;
use crate::error::RasterError;

/// What a raster was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RasterKey {
    pub glyph: GlyphId,
    pub tint: Color,
}

impl RasterKey {
    pub fn new(glyph: GlyphId, tint: Color) -> Self {
        Self { glyph, tint }
    }

    pub fn of(glyph: &GlyphDocument, tint: Color) -> Self {
        Self::new(glyph.id.clone(), tint)
    }
}

/// A decoded, tinted glyph bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRaster {
    key: RasterKey,
    pixmap: Pixmap,
}

impl GlyphRaster {
    pub fn new(key: RasterKey, pixmap: Pixmap) -> Self {
        Self { key, pixmap }
    }

    pub fn key(&self) -> &RasterKey {
        &self.key
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// Recolors `glyph` with `tint` and decodes it into a bitmap.
///
/// Failures are returned to the caller; no placeholder bitmap is substituted.
pub async fn recolor_and_rasterize(
    glyph: &GlyphDocument,
    tint: Color,
) -> Result<GlyphRaster, RasterError> {
    let svg = glyph.recolored(tint)?;
    let pixmap = decode_svg(&svg)?;
    Ok(GlyphRaster::new(RasterKey::of(glyph, tint), pixmap))
}

// ============================================================================
// RasterSlot
// ============================================================================

/// Proof that a rasterization was requested, used to hand its result back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTicket {
    generation: u64,
    key: RasterKey,
}

impl RasterTicket {
    pub fn key(&self) -> &RasterKey {
        &self.key
    }
}

/// Holds at most one glyph raster, keyed by glyph identity and tint.
///
/// Requests are numbered; only the result for the newest request is stored.
#[derive(Debug, Default)]
pub struct RasterSlot {
    generation: u64,
    pending: Option<RasterTicket>,
    current: Option<GlyphRaster>,
}

impl RasterSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raster to composite, if one is ready.
    pub fn current(&self) -> Option<&GlyphRaster> {
        self.current.as_ref()
    }

    /// Returns true while a request has been issued but not resolved.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Asks for a raster of `key`.
    ///
    /// Returns `None` when the current raster (or the outstanding request)
    /// already matches. Otherwise the current raster is released, any
    /// outstanding request is superseded, and a new ticket is issued.
    pub fn request(&mut self, key: RasterKey) -> Option<RasterTicket> {
        if self.current.as_ref().is_some_and(|r| r.key == key) {
            return None;
        }
        if self.pending.as_ref().is_some_and(|t| t.key == key) {
            return None;
        }

        self.generation = self.generation.wrapping_add(1);
        self.current = None;
        let ticket = RasterTicket {
            generation: self.generation,
            key,
        };
        self.pending = Some(ticket.clone());
        Some(ticket)
    }

    fn is_latest(&self, ticket: &RasterTicket) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.generation == ticket.generation)
    }

    /// Stores `raster` if `ticket` is the newest request.
    ///
    /// Returns false (and drops the raster) for superseded tickets.
    pub fn fulfil(&mut self, ticket: &RasterTicket, raster: GlyphRaster) -> bool {
        if !self.is_latest(ticket) {
            debug!(
                glyph = %ticket.key.glyph.0,
                tint = %ticket.key.tint,
                "discarding superseded glyph raster"
            );
            return false;
        }
        self.pending = None;
        self.current = Some(raster);
        true
    }

    /// Records that the newest request failed; the slot stays empty.
    ///
    /// Returns false for superseded tickets.
    pub fn fail(&mut self, ticket: &RasterTicket, error: &RasterError) -> bool {
        if !self.is_latest(ticket) {
            debug!(%error, "ignoring failure of superseded glyph raster");
            return false;
        }
        warn!(glyph = %ticket.key.glyph.0, %error, "glyph rasterization failed");
        self.pending = None;
        self.current = None;
        true
    }

    /// Drops the raster and any outstanding request.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending = None;
        self.current = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

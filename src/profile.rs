//! Serializable icon profile for saving and sharing designs.
//!
//! An [`IconProfile`] captures the background gradient, glyph style and
//! export settings in a JSON-friendly shape. The glyph itself is not part
//! of the profile.
//!
//! # Example
//!
//! ```
//! use appicon_renderer::{IconProfile, Shape};
//!
//! let profile = IconProfile::default();
//! assert_eq!(profile.background.shape, Shape::Linear);
//!
//! // Serialize to JSON for storage
//! let json = profile.to_json().unwrap();
//!
//! // Deserialize later
//! let restored = IconProfile::from_json(&json).unwrap();
//! assert_eq!(restored, profile);
//! ```

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::gradient::{GradientModel, Shape};
use crate::icon::{ExportSpec, IconStyle};

// ============================================================================
// Settings
// ============================================================================

/// One gradient stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct StopSettings {
    /// Hex color, `#rrggbb`.
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    #[cfg_attr(feature = "tsify", tsify(type = "string"))]
    pub color: Color,

    /// Position along the gradient, 0-100.
    pub pos: f64,
}

/// Serializable background gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct BackgroundSettings {
    /// `"linear"` or `"radial"`.
    #[serde(rename = "type")]
    #[cfg_attr(feature = "tsify", tsify(type = "\"linear\" | \"radial\""))]
    pub shape: Shape,

    /// Direction in degrees; ignored for radial gradients.
    pub angle: f64,

    /// Stops in editing order. At least two are required.
    pub stops: Vec<StopSettings>,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self::from(&GradientModel::default())
    }
}

impl From<&GradientModel> for BackgroundSettings {
    fn from(gradient: &GradientModel) -> Self {
        Self {
            shape: gradient.shape(),
            angle: gradient.angle(),
            stops: gradient
                .stops()
                .iter()
                .map(|s| StopSettings {
                    color: s.color,
                    pos: s.position,
                })
                .collect(),
        }
    }
}

/// Serializable glyph style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct IconStyleSettings {
    /// Glyph tint, `#rrggbb`.
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    #[cfg_attr(feature = "tsify", tsify(type = "string"))]
    pub color: Color,

    /// Glyph edge as a percentage of the tile (10-90).
    pub size_pct: f64,

    /// Vertical shift as a percentage of the tile; positive moves down.
    #[serde(default)]
    pub y_offset_pct: f64,
}

impl Default for IconStyleSettings {
    fn default() -> Self {
        Self::from(&IconStyle::default())
    }
}

impl From<&IconStyle> for IconStyleSettings {
    fn from(style: &IconStyle) -> Self {
        Self {
            color: style.tint,
            size_pct: style.size_percent(),
            y_offset_pct: style.vertical_offset_percent,
        }
    }
}

impl From<IconStyleSettings> for IconStyle {
    fn from(settings: IconStyleSettings) -> Self {
        IconStyle::new(settings.color, settings.size_pct, settings.y_offset_pct)
    }
}

/// Serializable export settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct ExportSettings {
    /// Output edge in pixels.
    pub size: u32,

    /// Corner radius in pixels.
    pub radius: f32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from(&ExportSpec::default())
    }
}

impl From<&ExportSpec> for ExportSettings {
    fn from(export: &ExportSpec) -> Self {
        Self {
            size: export.size,
            radius: export.corner_radius,
        }
    }
}

impl From<ExportSettings> for ExportSpec {
    fn from(settings: ExportSettings) -> Self {
        ExportSpec::new(settings.size, settings.radius)
    }
}

// ============================================================================
// IconProfile
// ============================================================================

/// A serializable profile containing all design settings.
///
/// Missing sections fall back to their defaults when deserializing.
///
/// # JSON Format
///
/// ```json
/// {
///   "background": {
///     "type": "linear",
///     "angle": 135.0,
///     "stops": [
///       { "color": "#ff0000", "pos": 0.0 },
///       { "color": "#0000ff", "pos": 100.0 }
///     ]
///   },
///   "iconStyle": { "color": "#ffffff", "sizePct": 44.0, "yOffsetPct": 0.0 },
///   "export": { "size": 256, "radius": 18.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct IconProfile {
    #[serde(default)]
    pub background: BackgroundSettings,

    #[serde(default)]
    pub icon_style: IconStyleSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

impl IconProfile {
    /// Creates a profile with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the background.
    pub fn with_background(mut self, gradient: &GradientModel) -> Self {
        self.background = gradient.into();
        self
    }

    /// Sets the glyph style.
    pub fn with_icon_style(mut self, style: &IconStyle) -> Self {
        self.icon_style = style.into();
        self
    }

    /// Sets the export settings.
    pub fn with_export(mut self, export: &ExportSpec) -> Self {
        self.export = export.into();
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Tests
// ============================================================================

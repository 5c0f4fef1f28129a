//! Glyph documents: sources, recoloring and decoding with resvg/usvg.
//!
//! Recoloring is a pure text-to-text transform. The input markup is parsed
//! with roxmltree and written back out with the tint applied, so cached
//! source documents are never touched.

use std::fmt::Write as _;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use roxmltree::{Document, Node};

use crate::color::Color;
use crate::error::RasterError;

/// Edge length forced onto recolored documents so they never decode to 0x0.
pub const GLYPH_RENDER_SIZE: u32 = 256;

/// View box edge assumed when a document declares neither a view box nor a size.
const DEFAULT_GLYPH_EXTENT: f64 = 24.0;

/// Fill value that defers to the inherited `color` property.
const CURRENT_COLOR: &str = "currentColor";

/// Elements that paint with their fill when none is declared.
const SHAPE_ELEMENTS: [&str; 7] = [
    "path", "rect", "circle", "ellipse", "line", "polyline", "polygon",
];

// ============================================================================
// SvgSource
// ============================================================================

/// Where a glyph's SVG markup comes from.
///
/// # Example
///
/// ```
/// use appicon_renderer::SvgSource;
///
/// let raw = SvgSource::from_svg("<svg>...</svg>");
/// assert!(raw.is_raw());
///
/// #[cfg(feature = "twemoji")]
/// let emoji = SvgSource::from_emoji("🦆").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    /// Raw SVG markup string.
    Raw(String),

    /// An emoji character resolved through `twemoji_assets` at render time.
    ///
    /// Resolves to nothing unless the `twemoji` feature is enabled.
    Emoji(String),
}

impl SvgSource {
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Creates a source from an emoji character.
    ///
    /// Returns `None` if the emoji is not supported by twemoji_assets.
    #[cfg(feature = "twemoji")]
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        use twemoji_assets::svg::SvgTwemojiAsset;

        SvgTwemojiAsset::from_emoji(emoji)?;
        Some(Self::Emoji(emoji.to_string()))
    }

    /// Resolves this source to SVG markup.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Raw(svg) => Some(svg.as_str()),
            #[cfg(feature = "twemoji")]
            Self::Emoji(emoji) => {
                use twemoji_assets::svg::SvgTwemojiAsset;
                let asset = SvgTwemojiAsset::from_emoji(emoji)?;
                Some(asset.as_ref())
            }
            #[cfg(not(feature = "twemoji"))]
            Self::Emoji(_) => None,
        }
    }

    pub fn is_emoji(&self) -> bool {
        matches!(self, Self::Emoji(_))
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl<S: Into<String>> From<S> for SvgSource {
    fn from(s: S) -> Self {
        Self::Raw(s.into())
    }
}

// ============================================================================
// GlyphDocument
// ============================================================================

/// Identity of a glyph, typically its name in the glyph library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlyphId(pub String);

impl From<&str> for GlyphId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A vector glyph and the key it is cached under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphDocument {
    pub id: GlyphId,
    pub source: SvgSource,
}

impl GlyphDocument {
    pub fn new(id: impl Into<GlyphId>, source: impl Into<SvgSource>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }

    /// Returns this document recolored with `tint`.
    pub fn recolored(&self, tint: Color) -> Result<String, RasterError> {
        let svg = self.source.resolve().ok_or(RasterError::MissingSource)?;
        recolor_svg(svg, tint)
    }
}

// ============================================================================
// Recoloring
// ============================================================================

/// Rewrites an SVG document so everything it fills is drawn in `tint`.
///
/// - `fill="none"` is left alone; any other explicit fill becomes
///   `currentColor`.
/// - Shape elements without a fill get `fill="currentColor"`.
/// - The root gets `color: <tint>` in its style, `fill="currentColor"`, a
///   `viewBox` inferred from `width`/`height` when missing, and a fixed
///   `width`/`height` of [`GLYPH_RENDER_SIZE`].
pub fn recolor_svg(svg: &str, tint: Color) -> Result<String, RasterError> {
    let doc = Document::parse(svg)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(RasterError::NotSvg(root.tag_name().name().to_string()));
    }

    let mut out = String::with_capacity(svg.len() + 128);
    write_element(root, tint, &mut out);
    Ok(out)
}

type Attrs = Vec<(String, String)>;

fn get<'a>(attrs: &'a Attrs, name: &str) -> Option<&'a str> {
    attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

fn set(attrs: &mut Attrs, name: &str, value: String) {
    match attrs.iter_mut().find(|(k, _)| k == name) {
        Some((_, v)) => *v = value,
        None => attrs.push((name.to_string(), value)),
    }
}

fn recolor_root(attrs: &mut Attrs, tint: Color) {
    if get(attrs, "viewBox").is_none() {
        let extent = |name| get(attrs, name).and_then(leading_number).unwrap_or(DEFAULT_GLYPH_EXTENT);
        let view_box = format!("0 0 {} {}", extent("width"), extent("height"));
        set(attrs, "viewBox", view_box);
    }
    set(attrs, "width", GLYPH_RENDER_SIZE.to_string());
    set(attrs, "height", GLYPH_RENDER_SIZE.to_string());

    let style = match get(attrs, "style").map(|s| s.trim().trim_end_matches(';')) {
        Some(existing) if !existing.is_empty() => format!("{existing};color:{tint}"),
        _ => format!("color:{tint}"),
    };
    set(attrs, "style", style);
    set(attrs, "fill", CURRENT_COLOR.to_string());
}

fn recolor_descendant(tag: &str, attrs: &mut Attrs) {
    match get(attrs, "fill") {
        Some(fill) if fill.trim().eq_ignore_ascii_case("none") => {}
        Some(_) => set(attrs, "fill", CURRENT_COLOR.to_string()),
        None if SHAPE_ELEMENTS.contains(&tag) => set(attrs, "fill", CURRENT_COLOR.to_string()),
        None => {}
    }
}

/// Parses the numeric prefix of a length such as `"24px"`.
fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .find(|&(i, ch)| !(ch.is_ascii_digit() || ch == '.' || (i == 0 && (ch == '-' || ch == '+'))))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse().ok().filter(|n: &f64| n.is_finite())
}

fn qualified_name(node: Node, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

fn write_element(node: Node, tint: Color, out: &mut String) {
    let tag = qualified_name(node, node.tag_name().namespace(), node.tag_name().name());

    let mut attrs: Attrs = Vec::new();

    // Declare only the namespaces this element introduces.
    let parent = node.parent_element();
    for ns in node.namespaces() {
        if ns.name() == Some("xml") {
            continue;
        }
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
        });
        if !inherited {
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            attrs.push((key, ns.uri().to_string()));
        }
    }

    for attr in node.attributes() {
        let key = qualified_name(node, attr.namespace(), attr.name());
        attrs.push((key, attr.value().to_string()));
    }

    if parent.is_none() {
        recolor_root(&mut attrs, tint);
    } else {
        recolor_descendant(node.tag_name().name(), &mut attrs);
    }

    out.push('<');
    out.push_str(&tag);
    for (key, value) in &attrs {
        let _ = write!(out, " {key}=\"{}\"", escape(value, true));
    }

    if !node.has_children() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    for child in node.children() {
        if child.is_element() {
            write_element(child, tint, out);
        } else if child.is_text() {
            out.push_str(&escape(child.text().unwrap_or_default(), false));
        } else if child.is_comment() {
            let _ = write!(out, "<!--{}-->", child.text().unwrap_or_default());
        }
    }

    let _ = write!(out, "</{tag}>");
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ============================================================================
// Decoding
// ============================================================================

/// Decodes an SVG document into a premultiplied pixmap at its natural size.
pub fn decode_svg(svg: &str) -> Result<Pixmap, RasterError> {
    let opts = Options::default();
    let tree = Tree::from_str(svg, &opts)?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or(RasterError::EmptyPixmap(width, height))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED_CIRCLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><circle cx="50" cy="50" r="40" fill="#ff0000"/></svg>"##;

    fn parse(svg: &str) -> Document<'_> {
        Document::parse(svg).expect("recolored output should be well-formed")
    }

    fn find<'a, 'i>(doc: &'a Document<'i>, tag: &str) -> Node<'a, 'i> {
        doc.descendants()
            .find(|n| n.has_tag_name(tag))
            .unwrap_or_else(|| panic!("no <{tag}> in output"))
    }

    #[test]
    fn explicit_fills_become_current_color() {
        let out = recolor_svg(RED_CIRCLE, Color::rgb(0, 255, 0)).unwrap();
        let doc = parse(&out);
        assert_eq!(find(&doc, "circle").attribute("fill"), Some("currentColor"));
    }

    #[test]
    fn fill_none_is_preserved() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0" fill="NONE" stroke="#000"/></svg>"##;
        let out = recolor_svg(svg, Color::WHITE).unwrap();
        let doc = parse(&out);
        let path = find(&doc, "path");
        assert_eq!(path.attribute("fill"), Some("NONE"));
        assert_eq!(path.attribute("stroke"), Some("#000"));
    }

    #[test]
    fn shapes_without_fill_get_one() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><g><rect width="4" height="4"/><path d="M0 0h4v4z"/></g></svg>"#;
        let out = recolor_svg(svg, Color::WHITE).unwrap();
        let doc = parse(&out);
        assert_eq!(find(&doc, "rect").attribute("fill"), Some("currentColor"));
        assert_eq!(find(&doc, "path").attribute("fill"), Some("currentColor"));
        assert_eq!(find(&doc, "g").attribute("fill"), None);
    }

    #[test]
    fn root_gets_tint_and_geometry() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="32px" height="16" style="opacity:0.5;" fill="none"/>"#;
        let out = recolor_svg(svg, Color::rgb(0x12, 0x34, 0x56)).unwrap();
        let doc = parse(&out);
        let root = doc.root_element();
        assert_eq!(root.attribute("viewBox"), Some("0 0 32 16"));
        assert_eq!(root.attribute("width"), Some("256"));
        assert_eq!(root.attribute("height"), Some("256"));
        assert_eq!(root.attribute("fill"), Some("currentColor"));
        assert_eq!(root.attribute("style"), Some("opacity:0.5;color:#123456"));
    }

    #[test]
    fn view_box_defaults_and_is_kept() {
        let bare = recolor_svg(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#, Color::WHITE).unwrap();
        assert_eq!(parse(&bare).root_element().attribute("viewBox"), Some("0 0 24 24"));

        let declared = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 448 512" width="10"/>"#;
        let kept = recolor_svg(declared, Color::WHITE).unwrap();
        assert_eq!(parse(&kept).root_element().attribute("viewBox"), Some("0 0 448 512"));
    }

    #[test]
    fn namespaces_and_text_survive() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><defs><path id="p" d="M0 0"/></defs><title>a &amp; b</title><use xlink:href="#p"/></svg>"##;
        let out = recolor_svg(svg, Color::WHITE).unwrap();
        assert!(out.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(out.contains(r##"xlink:href="#p""##));
        assert!(out.contains("a &amp; b"));
        let doc = parse(&out);
        assert_eq!(find(&doc, "title").text(), Some("a & b"));
    }

    #[test]
    fn source_markup_is_untouched() {
        let source = GlyphDocument::new("circle", RED_CIRCLE);
        let _ = source.recolored(Color::WHITE).unwrap();
        assert_eq!(source.source.resolve(), Some(RED_CIRCLE));
    }

    #[test]
    fn rejects_non_svg_and_malformed_documents() {
        assert!(matches!(
            recolor_svg("<html/>", Color::WHITE),
            Err(RasterError::NotSvg(tag)) if tag == "html"
        ));
        assert!(matches!(recolor_svg("<svg", Color::WHITE), Err(RasterError::Xml(_))));
    }

    #[test]
    fn leading_number_parses_lengths() {
        assert_eq!(leading_number("24"), Some(24.0));
        assert_eq!(leading_number(" 12.5px"), Some(12.5));
        assert_eq!(leading_number("auto"), None);
    }

    #[test]
    fn decode_recolored_glyph() {
        let svg = recolor_svg(RED_CIRCLE, Color::rgb(0, 255, 0)).unwrap();
        let pixmap = decode_svg(&svg).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (GLYPH_RENDER_SIZE, GLYPH_RENDER_SIZE));

        let center = pixmap.pixel(128, 128).unwrap();
        assert_eq!(center.alpha(), 255);
        assert!(center.green() > 200 && center.red() < 30, "center should be green");

        let corner = pixmap.pixel(1, 1).unwrap();
        assert_eq!(corner.alpha(), 0);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_svg("not svg").is_err());
    }

    #[test]
    fn svg_source_from_raw() {
        let source: SvgSource = "<svg></svg>".into();
        assert!(source.is_raw());
        assert!(!source.is_emoji());
        assert_eq!(source.resolve(), Some("<svg></svg>"));
    }

    #[cfg(not(feature = "twemoji"))]
    #[test]
    fn emoji_source_without_feature_is_missing() {
        let glyph = GlyphDocument::new("duck", SvgSource::Emoji("🦆".into()));
        assert!(matches!(glyph.recolored(Color::WHITE), Err(RasterError::MissingSource)));
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn emoji_source_recolors() {
        let source = SvgSource::from_emoji("🦆").expect("duck emoji should be supported");
        let glyph = GlyphDocument::new("duck", source);
        let svg = glyph.recolored(Color::WHITE).unwrap();
        assert!(decode_svg(&svg).is_ok());
    }
}

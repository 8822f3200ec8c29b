//! SVG string helpers and the fragment wrapper shared by every renderer.

use crate::Result;
use crate::text::TextStyle;
use netdiag_core::{DocumentStyle, FontStyle, LinkPalette, Rgb};
use std::fmt::Write as _;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Formats a number for an SVG attribute: at most 3 fractional digits, no `-0`, integers
/// without `.0`.
pub fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    } else {
        v = (v * 1000.0).round() / 1000.0;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        if start < i {
            out.push_str(&text[start..i]);
        }
        out.push_str(esc);
        start = i + 1;
    }
    if start < text.len() {
        out.push_str(&text[start..]);
    }
}

pub fn escape_attr(text: &str) -> String {
    escape_xml(text)
}

/// Resolved colors and font attributes for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_style: FontStyle,
    pub font_color: Rgb,
    pub background_color: Rgb,
    pub border_color: Rgb,
    pub node_color: Rgb,
    pub palette: LinkPalette,
}

impl RenderStyle {
    pub fn new(style: &DocumentStyle) -> Result<Self> {
        style.validate()?;
        let color = |field: &'static str, value: &str| {
            Rgb::from_hex(value).ok_or_else(|| netdiag_core::Error::InvalidColor {
                field,
                value: value.to_string(),
            })
        };
        Ok(Self {
            font_family: style.font_family.clone(),
            font_size: style.font_size,
            font_style: style.font_style,
            font_color: color("fontColor", &style.font_color)?,
            background_color: color("backgroundColor", &style.background_color)?,
            border_color: color("borderColor", &style.border_color)?,
            node_color: color("nodeColor", &style.node_color)?,
            palette: style.link_palette,
        })
    }

    /// The document font for measuring, resized by `size_delta` but never below 1.
    pub fn text_style(&self, size_delta: f64) -> TextStyle {
        TextStyle {
            font_family: Some(self.font_family.clone()),
            font_size: (self.font_size + size_delta).max(1.0),
            font_style: self.font_style,
        }
    }

    /// `<text>` attributes matching a measured [`TextStyle`].
    pub fn text_attrs<'a>(&'a self, text_style: &TextStyle, fill: Rgb) -> TextAttrs<'a> {
        TextAttrs {
            family: &self.font_family,
            size: text_style.font_size,
            style: text_style.font_style,
            fill,
        }
    }
}

/// Font attributes for a `<text>` element.
#[derive(Debug, Clone, Copy)]
pub struct TextAttrs<'a> {
    pub family: &'a str,
    pub size: f64,
    pub style: FontStyle,
    pub fill: Rgb,
}

pub fn write_text(out: &mut String, x: f64, y: f64, text: &str, attrs: &TextAttrs<'_>) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}""#,
        fmt(x),
        fmt(y),
        escape_attr(attrs.family),
        fmt(attrs.size)
    );
    if let Some(weight) = attrs.style.svg_weight() {
        let _ = write!(out, r#" font-weight="{weight}""#);
    }
    if let Some(style) = attrs.style.svg_style() {
        let _ = write!(out, r#" font-style="{style}""#);
    }
    let _ = write!(out, r#" fill="{}">"#, attrs.fill);
    escape_xml_into(out, text);
    out.push_str("</text>");
}

pub fn write_rect(
    out: &mut String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill: Option<Rgb>,
    stroke: Option<(Rgb, f64)>,
) {
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        fmt(x),
        fmt(y),
        fmt(width),
        fmt(height)
    );
    match fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{fill}""#);
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some((stroke, width)) = stroke {
        let _ = write!(out, r#" stroke="{stroke}" stroke-width="{}""#, fmt(width));
    }
    out.push_str("/>");
}

/// A self-contained `<svg>` drawing placed into the document at an offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub class: &'static str,
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub body: String,
}

impl Fragment {
    pub fn new(class: &'static str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            class,
            id: None,
            x,
            y,
            width,
            height,
            body: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn write_to(&self, out: &mut String) {
        let _ = write!(out, r#"<g class="{}""#, self.class);
        if let Some(id) = &self.id {
            let _ = write!(out, r#" id="{}""#, escape_attr(id));
        }
        let _ = write!(
            out,
            r#" transform="translate({},{})"><svg xmlns="{SVG_NS}" width="{}" height="{}">"#,
            fmt(self.x),
            fmt(self.y),
            fmt(self.width),
            fmt(self.height)
        );
        out.push_str(&self.body);
        out.push_str("</svg></g>\n");
    }
}

/// Drops every namespace declaration after the first one (the document root).
pub fn strip_nested_namespaces(svg: &str) -> String {
    let decl = format!(r#" xmlns="{SVG_NS}""#);
    let Some(first) = svg.find(&decl) else {
        return svg.to_string();
    };
    let split = first + decl.len();
    let mut out = String::with_capacity(svg.len());
    out.push_str(&svg[..split]);
    out.push_str(&svg[split..].replace(&decl, ""));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_style_is_resized_but_never_below_one() {
        let rs = RenderStyle::new(&DocumentStyle::default()).unwrap();
        assert_eq!(rs.text_style(4.0).font_size, 16.0);
        assert_eq!(rs.text_style(-40.0).font_size, 1.0);
        assert_eq!(rs.text_style(0.0).font_family.as_deref(), Some("Arial"));

        let attrs = rs.text_attrs(&rs.text_style(-2.0), Rgb::BLACK);
        assert_eq!((attrs.family, attrs.size), ("Arial", 10.0));
    }

    #[test]
    fn fmt_avoids_noise_and_negative_zero() {
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(-1e-12), "0");
        assert_eq!(fmt(12.0), "12");
        assert_eq!(fmt(1.0000004), "1");
        assert_eq!(fmt(2.5), "2.5");
        assert_eq!(fmt(-7.25), "-7.25");
        assert_eq!(fmt(24.0 * 0.6), "14.4");
        assert_eq!(fmt(1.0 / 3.0), "0.333");
        assert_eq!(fmt(-0.0001), "0");
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_xml(r#"A&B <"x"> 'y'"#), "A&amp;B &lt;&quot;x&quot;&gt; &#39;y&#39;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn fragment_wraps_body_in_translated_svg() {
        let mut f = Fragment::new("node", 10.0, -5.5, 100.0, 60.0).with_id("a\"b");
        f.body.push_str("<rect/>");
        let mut out = String::new();
        f.write_to(&mut out);
        assert_eq!(
            out,
            "<g class=\"node\" id=\"a&quot;b\" transform=\"translate(10,-5.5)\">\
             <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"60\"><rect/></svg></g>\n"
        );
    }

    #[test]
    fn only_the_root_namespace_survives() {
        let doc = format!(
            r#"<svg xmlns="{SVG_NS}"><g><svg xmlns="{SVG_NS}" width="1"/></g><svg xmlns="{SVG_NS}"/></svg>"#
        );
        let stripped = strip_nested_namespaces(&doc);
        assert_eq!(stripped.matches("xmlns=").count(), 1);
        assert!(stripped.starts_with(&format!(r#"<svg xmlns="{SVG_NS}">"#)));
        assert!(stripped.contains(r#"<svg width="1"/>"#));
    }

    #[test]
    fn text_carries_font_attributes() {
        let mut out = String::new();
        write_text(
            &mut out,
            1.0,
            2.0,
            "a<b",
            &TextAttrs {
                family: "Arial",
                size: 12.0,
                style: FontStyle::Bold,
                fill: Rgb::BLACK,
            },
        );
        assert_eq!(
            out,
            r##"<text x="1" y="2" font-family="Arial" font-size="12" font-weight="bold" fill="#000000">a&lt;b</text>"##
        );
    }

    #[test]
    fn render_style_resolves_hex_colors() {
        let rs = RenderStyle::new(&DocumentStyle::default()).unwrap();
        assert_eq!(rs.node_color, Rgb::WHITE);
        let bad = DocumentStyle {
            node_color: "white".to_string(),
            ..Default::default()
        };
        assert!(RenderStyle::new(&bad).is_err());
    }
}

use crate::Result;
use crate::arrow::build_arrow_polygon;
use crate::layout::LinkFrame;
use crate::svg::{Fragment, RenderStyle, fmt, write_rect, write_text};
use crate::text::TextMeasurer;
use netdiag_core::Link;
use netdiag_core::geom::{Point, point};
use netdiag_core::palette::clamp_percentage;
use std::fmt::Write as _;

const LABEL_PADDING: f64 = 2.0;
const LINK_STROKE_WIDTH: f64 = 3.0;

/// Whole percent shown on a link label.
pub fn traffic_percent(traffic: f64) -> u8 {
    clamp_percentage(traffic) as u8
}

/// Two arrows meeting in the middle, each colored by its own direction's traffic and labelled
/// with it.
pub fn render_link(
    link: &Link,
    frame: &LinkFrame,
    style: &RenderStyle,
    measurer: &dyn TextMeasurer,
) -> Result<Fragment> {
    let mut fragment = Fragment::new(
        "link",
        frame.origin.0 as f64,
        frame.origin.1 as f64,
        frame.width as f64,
        frame.height as f64,
    );

    let outgoing = traffic_percent(link.outgoing_traffic);
    let incoming = traffic_percent(link.incoming_traffic);
    let outgoing_color = style.palette.color_for(outgoing as f64);
    let incoming_color = style.palette.color_for(incoming as f64);

    let source = frame.source_point;
    let target = frame.target_point;
    let mid = point((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);

    let out = &mut fragment.body;
    let _ = write!(out, r#"<g stroke-width="{}">"#, fmt(LINK_STROKE_WIDTH));
    build_arrow_polygon(source, mid)?.write_svg(out, outgoing_color, style.border_color);
    build_arrow_polygon(target, mid)?.write_svg(out, incoming_color, style.border_color);
    write_traffic_label(out, source, mid, outgoing, style, measurer);
    write_traffic_label(out, target, mid, incoming, style, measurer);
    out.push_str("</g>");

    Ok(fragment)
}

/// `"{n}%"` on a padded, node-colored box, centered between `start` and `end`.
pub fn write_traffic_label(
    out: &mut String,
    start: Point,
    end: Point,
    percent: u8,
    style: &RenderStyle,
    measurer: &dyn TextMeasurer,
) {
    let text = format!("{percent}%");
    let text_style = style.text_style(0.0);
    let metrics = measurer.measure(&text, &text_style);
    let text_width = metrics.width;
    let text_height = metrics.label_height();

    let x = (start.x + end.x - text_width) / 2.0;
    let y = (start.y + end.y + text_height) / 2.0;

    write_rect(
        out,
        x - LABEL_PADDING,
        y - text_height - LABEL_PADDING,
        text_width + 2.0 * LABEL_PADDING,
        text_height + 2.0 * LABEL_PADDING,
        Some(style.node_color),
        Some((style.border_color, 1.0)),
    );
    write_text(
        out,
        x,
        y,
        &text,
        &style.text_attrs(&text_style, style.font_color),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::DeterministicTextMeasurer;
    use netdiag_core::{DocumentStyle, LinkPalette, Rgb};

    fn frame() -> LinkFrame {
        LinkFrame {
            link: 0,
            origin: (-40, -45),
            width: 140,
            height: 100,
            source_point: point(50.0, 50.0),
            target_point: point(90.0, 50.0),
        }
    }

    #[test]
    fn traffic_is_clamped_and_truncated() {
        assert_eq!(traffic_percent(42.9), 42);
        assert_eq!(traffic_percent(-5.0), 0);
        assert_eq!(traffic_percent(250.0), 100);
        assert_eq!(traffic_percent(f64::NAN), 0);
    }

    #[test]
    fn each_direction_gets_its_own_color_and_label() {
        let style = DocumentStyle {
            link_palette: LinkPalette::Grayscale,
            ..Default::default()
        };
        let rs = RenderStyle::new(&style).unwrap();
        let link = Link::new("a", "b", 100.0, 0.0);
        let f = render_link(&link, &frame(), &rs, &DeterministicTextMeasurer::default()).unwrap();

        assert_eq!(f.class, "link");
        assert_eq!((f.x, f.y), (-40.0, -45.0));
        assert!(f.body.starts_with(r#"<g stroke-width="3">"#));
        assert_eq!(f.body.matches("<path").count(), 2);
        assert!(f.body.contains(&format!(r##"fill="{}" stroke="#000000" stroke-width="1""##, Rgb::WHITE)));
        assert!(f.body.contains(&format!(r##"fill="{}" stroke="#000000" stroke-width="1""##, Rgb::BLACK)));
        assert!(f.body.contains(">100%</text>"));
        assert!(f.body.contains(">0%</text>"));
    }

    #[test]
    fn over_range_traffic_shows_clamped_value() {
        let rs = RenderStyle::new(&DocumentStyle::default()).unwrap();
        let link = Link::new("a", "b", 180.0, -3.0);
        let f = render_link(&link, &frame(), &rs, &DeterministicTextMeasurer::default()).unwrap();
        assert!(f.body.contains(">100%</text>"));
        assert!(f.body.contains(">0%</text>"));
        assert!(!f.body.contains("180"));
    }

    #[test]
    fn label_box_is_padded_around_the_text() {
        let rs = RenderStyle::new(&DocumentStyle::default()).unwrap();
        let mut out = String::new();
        // "5%" at 12px: width 14.4, height 7.2.
        write_traffic_label(
            &mut out,
            point(0.0, 0.0),
            point(40.0, 20.0),
            5,
            &rs,
            &DeterministicTextMeasurer::default(),
        );
        // x = (40 - 14.4) / 2 = 12.8, y = (20 + 7.2) / 2 = 13.6
        assert!(
            out.starts_with(r#"<rect x="10.8" y="4.4" width="18.4" height="11.2""#),
            "{out}"
        );
        assert!(out.contains(r#"<text x="12.8" y="13.6""#), "{out}");
    }
}

use crate::layout::NodeFrame;
use crate::svg::{Fragment, RenderStyle, write_rect, write_text};
use crate::text::TextMeasurer;
use netdiag_core::geom::Rect;

/// Filled, bordered rectangle with the label centered on it. Empty labels draw no text.
pub fn write_node_body(
    out: &mut String,
    rect: &Rect,
    label: &str,
    stroke_width: f64,
    style: &RenderStyle,
    measurer: &dyn TextMeasurer,
) {
    write_rect(
        out,
        rect.origin.x,
        rect.origin.y,
        rect.size.width,
        rect.size.height,
        Some(style.node_color),
        Some((style.border_color, stroke_width)),
    );
    if label.is_empty() {
        return;
    }

    let text_style = style.text_style(0.0);
    let metrics = measurer.measure(label, &text_style);
    let x = rect.origin.x + (rect.size.width - metrics.width) / 2.0;
    let y = rect.origin.y + (rect.size.height + metrics.label_height()) / 2.0;
    write_text(
        out,
        x,
        y,
        label,
        &style.text_attrs(&text_style, style.font_color),
    );
}

pub fn render_node(
    frame: &NodeFrame,
    label: &str,
    style: &RenderStyle,
    measurer: &dyn TextMeasurer,
) -> Fragment {
    let mut fragment = Fragment::new(
        "node",
        frame.origin.0 as f64,
        frame.origin.1 as f64,
        frame.width as f64,
        frame.height as f64,
    )
    .with_id(frame.id.clone());
    write_node_body(&mut fragment.body, &frame.local, label, 1.0, style, measurer);
    fragment
}

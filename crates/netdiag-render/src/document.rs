//! Document composition: layout pass, then one SVG fragment per element.

use crate::connection::resolve_connection_point;
use crate::layout::{
    DocumentDimensions, DocumentLayout, LayoutTable, LinkFrame, NodeFrame, SuperNodeBox,
};
use crate::link::render_link;
use crate::node::render_node;
use crate::super_node::{calculate_size, render_super_node, update_node_positions};
use crate::svg::{Fragment, RenderStyle, SVG_NS, strip_nested_namespaces, write_rect, write_text};
use crate::text::TextMeasurer;
use crate::{RenderOptions, Result};
use netdiag_core::geom::{Rect, point, rect};
use netdiag_core::{Diagram, DocumentStyle, FontStyle, Rgb};
use std::fmt::Write as _;

/// Padding around each node/link frame.
const FRAME_MARGIN: i64 = 50;
const CANVAS_MARGIN: i64 = 5;

const TITLE_Y: f64 = 30.0;
const TITLE_SIZE_DELTA: f64 = 4.0;

const LEGEND_TITLE: &str = "Load Scale Legend";
const LEGEND_X: f64 = 20.0;
const LEGEND_BOTTOM_OFFSET: f64 = 50.0;
const LEGEND_STRIP_GAP: f64 = 10.0;
const LEGEND_CELLS: u32 = 100;
const LEGEND_CELL_WIDTH: f64 = 2.0;
const LEGEND_CELL_HEIGHT: f64 = 20.0;
const LEGEND_LABEL_GAP: f64 = 15.0;
const LEGEND_TICK_SIZE_DELTA: f64 = -2.0;
const LEGEND_TICKS: [u32; 8] = [0, 10, 25, 40, 55, 70, 85, 100];

/// Canvas size: the furthest node or super-node corner, seeded at the origin, plus a margin.
pub fn calculate_dimensions<'a>(
    node_rects: impl IntoIterator<Item = &'a Rect>,
    super_nodes: &[SuperNodeBox],
) -> DocumentDimensions {
    let mut max_x = 0.0f64;
    let mut max_y = 0.0f64;
    for r in node_rects {
        max_x = max_x.max(r.max_x());
        max_y = max_y.max(r.max_y());
    }
    for sn in super_nodes {
        max_x = max_x.max((sn.x + sn.size.width) as f64);
        max_y = max_y.max((sn.y + sn.size.height) as f64);
    }
    DocumentDimensions {
        width: max_x.ceil() as i64 + CANVAS_MARGIN,
        height: max_y.ceil() as i64 + CANVAS_MARGIN,
    }
}

fn frame_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> ((i64, i64), i64, i64) {
    let x0 = min_x.floor() as i64 - FRAME_MARGIN;
    let y0 = min_y.floor() as i64 - FRAME_MARGIN;
    let x1 = max_x.floor() as i64 + FRAME_MARGIN;
    let y1 = max_y.floor() as i64 + FRAME_MARGIN;
    ((x0, y0), x1 - x0, y1 - y0)
}

/// Runs super-node layout and computes every fragment frame. The input is not modified.
pub fn layout_document(diagram: &Diagram) -> Result<DocumentLayout> {
    let mut nodes = LayoutTable::from_diagram(diagram);

    let mut super_nodes = Vec::with_capacity(diagram.super_nodes.len());
    for sn in &diagram.super_nodes {
        let size = calculate_size(sn, &nodes)?;
        update_node_positions(sn, size, &mut nodes)?;
        super_nodes.push(SuperNodeBox {
            id: sn.id.clone(),
            label: sn.label.clone(),
            x: sn.x,
            y: sn.y,
            size,
        });
    }

    let node_rects: Vec<Rect> = diagram
        .nodes
        .iter()
        .filter_map(|n| nodes.get(&n.id).copied())
        .collect();
    let dimensions = calculate_dimensions(&node_rects, &super_nodes);

    let mut link_frames = Vec::with_capacity(diagram.links.len());
    for (idx, link) in diagram.links.iter().enumerate() {
        let (Some(source), Some(target)) = (nodes.get(&link.source), nodes.get(&link.target))
        else {
            tracing::debug!(
                source = %link.source,
                target = %link.target,
                "skipping link with unknown endpoint"
            );
            continue;
        };
        let sp = resolve_connection_point(source, target)?;
        let tp = resolve_connection_point(target, source)?;
        let (origin, width, height) = frame_bounds(
            sp.x.min(tp.x),
            sp.y.min(tp.y),
            sp.x.max(tp.x),
            sp.y.max(tp.y),
        );
        let (ox, oy) = (origin.0 as f64, origin.1 as f64);
        link_frames.push(LinkFrame {
            link: idx,
            origin,
            width,
            height,
            source_point: point(sp.x - ox, sp.y - oy),
            target_point: point(tp.x - ox, tp.y - oy),
        });
    }

    let mut node_frames = Vec::with_capacity(diagram.nodes.len());
    for node in &diagram.nodes {
        let Some(r) = nodes.get(&node.id) else {
            continue;
        };
        let (origin, width, height) = frame_bounds(r.min_x(), r.min_y(), r.max_x(), r.max_y());
        node_frames.push(NodeFrame {
            id: node.id.clone(),
            origin,
            width,
            height,
            local: rect(
                r.origin.x - origin.0 as f64,
                r.origin.y - origin.1 as f64,
                r.size.width,
                r.size.height,
            ),
        });
    }

    Ok(DocumentLayout {
        dimensions,
        nodes,
        super_nodes,
        node_frames,
        link_frames,
    })
}

/// Centered bold title near the top edge, drawn in black.
pub fn render_title(
    title: &str,
    dimensions: DocumentDimensions,
    style: &RenderStyle,
    measurer: &dyn TextMeasurer,
) -> Fragment {
    let (w, h) = (dimensions.width as f64, dimensions.height as f64);
    let mut fragment = Fragment::new("title", 0.0, 0.0, w, h);
    let text_style = style
        .text_style(TITLE_SIZE_DELTA)
        .with_font_style(FontStyle::Bold);
    let text_width = measurer.measure(title, &text_style).width;
    write_text(
        &mut fragment.body,
        w / 2.0 - text_width / 2.0,
        TITLE_Y,
        title,
        &style.text_attrs(&text_style, Rgb::BLACK),
    );
    fragment
}

/// Color strip sampling the active ramp at 0..100 with percentage ticks underneath.
pub fn render_legend(dimensions: DocumentDimensions, style: &RenderStyle) -> Fragment {
    let (w, h) = (dimensions.width as f64, dimensions.height as f64);
    let mut fragment = Fragment::new("legend", 0.0, 0.0, w, h);
    let out = &mut fragment.body;

    let title_y = h - LEGEND_BOTTOM_OFFSET;
    write_text(
        out,
        LEGEND_X,
        title_y,
        LEGEND_TITLE,
        &style.text_attrs(&style.text_style(0.0), Rgb::BLACK),
    );

    let strip_y = title_y + LEGEND_STRIP_GAP;
    for i in 0..LEGEND_CELLS {
        write_rect(
            out,
            LEGEND_X + i as f64 * LEGEND_CELL_WIDTH,
            strip_y,
            LEGEND_CELL_WIDTH,
            LEGEND_CELL_HEIGHT,
            Some(style.palette.color_for(i as f64)),
            None,
        );
    }

    let label_y = strip_y + LEGEND_CELL_HEIGHT + LEGEND_LABEL_GAP;
    let tick_style = style.text_style(LEGEND_TICK_SIZE_DELTA);
    for p in LEGEND_TICKS {
        write_text(
            out,
            LEGEND_X + p as f64 * LEGEND_CELL_WIDTH,
            label_y,
            &format!("{p}%"),
            &style.text_attrs(&tick_style, Rgb::BLACK),
        );
    }
    fragment
}

/// Renders a validated diagram to a standalone SVG document.
///
/// Output order: background, title, links, nodes, super-nodes, legend.
pub fn render_document(
    diagram: &Diagram,
    style: &DocumentStyle,
    options: &RenderOptions,
) -> Result<String> {
    let render_style = RenderStyle::new(style)?;
    let measurer = options.text_measurer.as_ref();
    let layout = layout_document(diagram)?;
    let dims = layout.dimensions;

    tracing::debug!(
        nodes = diagram.nodes.len(),
        super_nodes = diagram.super_nodes.len(),
        links = layout.link_frames.len(),
        width = dims.width,
        height = dims.height,
        "rendering network diagram"
    );

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="{SVG_NS}" width="{}" height="{}">"#,
        dims.width, dims.height
    );
    out.push('\n');
    let _ = writeln!(
        out,
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        render_style.background_color
    );

    if let Some(title) = style.visible_title() {
        render_title(title, dims, &render_style, measurer).write_to(&mut out);
    }

    for frame in &layout.link_frames {
        let link = &diagram.links[frame.link];
        render_link(link, frame, &render_style, measurer)?.write_to(&mut out);
    }

    for (frame, node) in layout.node_frames.iter().zip(diagram.nodes.iter()) {
        render_node(frame, &node.label, &render_style, measurer).write_to(&mut out);
    }

    for sn in &layout.super_nodes {
        render_super_node(sn, &render_style, measurer).write_to(&mut out);
    }

    if style.show_legend {
        render_legend(dims, &render_style).write_to(&mut out);
    }

    out.push_str("</svg>\n");
    Ok(strip_nested_namespaces(&out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use netdiag_core::{Link, Node, NodeSide, SuperNode};

    fn two_nodes() -> Diagram {
        Diagram {
            nodes: vec![
                Node::new("1", 0.0, 0.0, 10.0, 10.0, "a"),
                Node::new("2", 50.0, 0.0, 10.0, 10.0, "b"),
            ],
            links: vec![Link::new("1", "2", 30.0, 60.0)],
            ..Default::default()
        }
    }

    #[test]
    fn empty_diagram_has_a_five_pixel_canvas() {
        let layout = layout_document(&Diagram::default()).unwrap();
        assert_eq!(
            layout.dimensions,
            DocumentDimensions {
                width: 5,
                height: 5
            }
        );
    }

    #[test]
    fn dimensions_cover_nodes_and_super_nodes() {
        let rects = [rect(10.0, 10.0, 20.5, 5.0)];
        let boxes = [SuperNodeBox {
            id: "s".to_string(),
            label: String::new(),
            x: 0,
            y: 40,
            size: crate::layout::SuperNodeSize {
                width: 10,
                height: 10,
            },
        }];
        let d = calculate_dimensions(&rects, &boxes);
        assert_eq!(d, DocumentDimensions { width: 36, height: 55 });
    }

    #[test]
    fn link_and_node_frames_are_padded() {
        let layout = layout_document(&two_nodes()).unwrap();
        let lf = &layout.link_frames[0];
        // Connection points (10, 5) and (50, 5).
        assert_eq!(lf.origin, (-40, -45));
        assert_eq!((lf.width, lf.height), (140, 100));
        assert_eq!(lf.source_point, point(50.0, 50.0));
        assert_eq!(lf.target_point, point(90.0, 50.0));

        let nf = &layout.node_frames[1];
        assert_eq!(nf.origin, (0, -50));
        assert_eq!((nf.width, nf.height), (110, 110));
        assert_eq!(nf.local, rect(50.0, 50.0, 10.0, 10.0));
    }

    #[test]
    fn links_with_unknown_endpoints_are_skipped() {
        let mut d = two_nodes();
        d.links.push(Link::new("1", "404", 10.0, 10.0));
        let layout = layout_document(&d).unwrap();
        assert_eq!(layout.link_frames.len(), 1);
        let svg = render_document(&d, &DocumentStyle::default(), &RenderOptions::default()).unwrap();
        assert_eq!(svg.matches(r#"<g class="link""#).count(), 1);
    }

    #[test]
    fn super_node_layout_feeds_links_and_canvas() {
        let d = Diagram {
            nodes: vec![
                Node::new("1", 0.0, 0.0, 40.0, 20.0, "a"),
                Node::new("2", 500.0, 0.0, 40.0, 20.0, "b"),
            ],
            super_nodes: vec![SuperNode::new("s", 100, 100, "S").with_member("1", NodeSide::Bottom)],
            links: vec![Link::new("1", "2", 0.0, 0.0)],
        };
        let layout = layout_document(&d).unwrap();
        // Width max(40, -10, 7) + 40 = 80, height 30; bottom member at (100 + 20, 100 + 30 + 5).
        let r = layout.nodes.get("1").unwrap();
        assert_eq!((r.origin.x, r.origin.y), (120.0, 135.0));
        assert_eq!(layout.dimensions.width, 545);
        assert_eq!(layout.dimensions.height, 160);
        // The input is untouched.
        assert_eq!(d.nodes[0].x, 0.0);
    }

    #[test]
    fn title_and_legend_are_optional() {
        let d = two_nodes();
        let mut style = DocumentStyle::default();
        let svg = render_document(&d, &style, &RenderOptions::default()).unwrap();
        assert!(svg.contains(r#"<g class="legend""#));
        assert!(!svg.contains(r#"<g class="title""#));

        style.title = Some("Backbone".to_string());
        style.show_title = true;
        style.show_legend = false;
        let svg = render_document(&d, &style, &RenderOptions::default()).unwrap();
        assert!(svg.contains(">Backbone</text>"));
        assert!(svg.contains(r#"font-size="16" font-weight="bold""#));
        assert!(!svg.contains(LEGEND_TITLE));
    }

    #[test]
    fn legend_samples_the_ramp() {
        let rs = RenderStyle::new(&DocumentStyle::default()).unwrap();
        let f = render_legend(DocumentDimensions { width: 300, height: 200 }, &rs);
        assert_eq!(f.body.matches("<rect").count(), 100);
        assert!(f.body.contains(r##"<rect x="20" y="160" width="2" height="20" fill="#00ff00"/>"##));
        assert!(f.body.contains(r#"<text x="220" y="195""#));
        assert!(f.body.contains(r#"font-size="10""#));
        assert!(f.body.contains(">Load Scale Legend</text>"));
    }

    #[test]
    fn invalid_colors_abort_the_render() {
        let style = DocumentStyle {
            background_color: "#12".to_string(),
            ..Default::default()
        };
        assert!(render_document(&two_nodes(), &style, &RenderOptions::default()).is_err());
    }
}

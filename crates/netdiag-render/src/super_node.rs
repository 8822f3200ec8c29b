//! Super-node sizing and member placement.
//!
//! A super-node is a labelled box whose members sit outside its four edges. Its size grows with
//! the widest member row (top/bottom) and the tallest member column (left/right).

use crate::layout::{LayoutTable, SuperNodeBox, SuperNodeSize};
use crate::node::write_node_body;
use crate::svg::{Fragment, RenderStyle};
use crate::text::TextMeasurer;
use crate::{Error, Result};
use netdiag_core::geom::rect;
use netdiag_core::{NodeSide, SuperNode};

const SIZE_GAP: i32 = 10;
const MEMBER_SPACING: i32 = 5;
const MEMBER_OFFSET: i32 = 5;
const PADDING: i32 = 40;
const TITLE_CHAR_WIDTH: i32 = 7;
const BORDER_WIDTH: f64 = 2.0;

fn member_extents(
    sn: &SuperNode,
    side: NodeSide,
    table: &LayoutTable,
) -> Result<Vec<(String, f64, f64)>> {
    sn.members_on(side)
        .iter()
        .map(|id| {
            let r = table.get(id).ok_or_else(|| Error::InvalidArgument {
                message: format!("node {id} of super node {} is not in the node table", sn.id),
            })?;
            Ok((id.clone(), r.size.width, r.size.height))
        })
        .collect()
}

/// Sum of truncated extents plus `gap` between neighbours. An empty side yields `-gap`.
fn side_total(extents: &[(String, f64, f64)], gap: i32, horizontal: bool) -> i32 {
    let sum: i32 = extents
        .iter()
        .map(|(_, w, h)| if horizontal { *w as i32 } else { *h as i32 })
        .sum();
    sum + (extents.len() as i32 - 1) * gap
}

pub fn calculate_size(sn: &SuperNode, table: &LayoutTable) -> Result<SuperNodeSize> {
    let total = |side: NodeSide| -> Result<i32> {
        let extents = member_extents(sn, side, table)?;
        Ok(side_total(&extents, SIZE_GAP, side.is_horizontal_row()))
    };

    let width_from_nodes = total(NodeSide::Top)?.max(total(NodeSide::Bottom)?);
    let height_from_nodes = total(NodeSide::Left)?.max(total(NodeSide::Right)?);
    let width_from_title = sn.label.chars().count() as i32 * TITLE_CHAR_WIDTH;

    Ok(SuperNodeSize {
        width: width_from_nodes.max(width_from_title) + PADDING,
        height: height_from_nodes + PADDING,
    })
}

/// Places members just outside the box: rows centered above/below, columns centered left/right.
pub fn update_node_positions(
    sn: &SuperNode,
    size: SuperNodeSize,
    table: &mut LayoutTable,
) -> Result<()> {
    let (sx, sy) = (sn.x, sn.y);
    let (w, h) = (size.width, size.height);

    for side in NodeSide::ALL {
        let extents = member_extents(sn, side, table)?;
        let Some((_, first_w, first_h)) = extents.first().cloned() else {
            continue;
        };
        let total_w = side_total(&extents, MEMBER_SPACING, true);
        let total_h = side_total(&extents, MEMBER_SPACING, false);

        let (mut x, mut y) = match side {
            NodeSide::Top => (
                sx + (w - total_w) / 2,
                (sy as f64 - MEMBER_OFFSET as f64 - first_h) as i32,
            ),
            NodeSide::Bottom => (sx + (w - total_w) / 2, sy + h + MEMBER_OFFSET),
            NodeSide::Left => (
                (sx as f64 - MEMBER_OFFSET as f64 - first_w) as i32,
                sy + (h - total_h) / 2,
            ),
            NodeSide::Right => (sx + w + MEMBER_OFFSET, sy + (h - total_h) / 2),
        };

        for (id, mw, mh) in &extents {
            table.move_to(id, x as f64, y as f64);
            if side.is_horizontal_row() {
                x += (mw + MEMBER_SPACING as f64) as i32;
            } else {
                y += (mh + MEMBER_SPACING as f64) as i32;
            }
        }
        tracing::trace!(super_node = %sn.id, side = side.as_str(), members = extents.len(), "placed members");
    }
    Ok(())
}

/// The box in its own `W x H` frame, translated to the super-node position.
pub fn render_super_node(
    sn: &SuperNodeBox,
    style: &RenderStyle,
    measurer: &dyn TextMeasurer,
) -> Fragment {
    let (w, h) = (sn.size.width as f64, sn.size.height as f64);
    let mut fragment =
        Fragment::new("super-node", sn.x as f64, sn.y as f64, w, h).with_id(sn.id.clone());
    write_node_body(
        &mut fragment.body,
        &rect(0.0, 0.0, w, h),
        &sn.label,
        BORDER_WIDTH,
        style,
        measurer,
    );
    fragment
}

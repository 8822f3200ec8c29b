//! Where a link touches a node's boundary.

use crate::{Error, Result};
use netdiag_core::geom::{Point, Rect, is_finite_rect, point};

/// Corner nudge toward the node center, keeping link ends off exact edges.
pub const OFFSET: f64 = 5.0;

/// Picks the point on `node`'s boundary that faces `other`.
///
/// The axis with the strictly larger center-to-center displacement wins; ties go vertical.
pub fn resolve_connection_point(node: &Rect, other: &Rect) -> Result<Point> {
    for (name, r) in [("node", node), ("other", other)] {
        if !is_finite_rect(r) {
            return Err(Error::InvalidArgument {
                message: format!("{name} rectangle has non-finite coordinates: {r:?}"),
            });
        }
    }

    let c1 = node.center();
    let c2 = other.center();
    let dx = c1.x - c2.x;
    let dy = c1.y - c2.y;

    let p = if dx.abs() > dy.abs() {
        horizontal(node, c1, c2)
    } else {
        vertical(node, c1, c2)
    };
    Ok(p)
}

fn horizontal(node: &Rect, c1: Point, c2: Point) -> Point {
    let x = if c1.x < c2.x { node.max_x() } else { node.min_x() };
    let y = if (c1.y - c2.y).abs() <= node.size.height + 3.0 {
        c1.y
    } else if c1.y < c2.y {
        node.max_y()
    } else {
        node.min_y()
    };
    let p = point(x, y);
    if y == node.min_y() || y == node.max_y() {
        nudge(p, c1)
    } else {
        p
    }
}

fn vertical(node: &Rect, c1: Point, c2: Point) -> Point {
    let x = c1.x;
    let y = if c1.y < c2.y {
        node.max_y() - OFFSET
    } else {
        node.min_y() + OFFSET
    };
    let p = point(x, y);
    if x == node.min_x() || x == node.max_x() {
        nudge(p, c1)
    } else {
        p
    }
}

fn nudge(p: Point, center: Point) -> Point {
    let x = if p.x < center.x { p.x + OFFSET } else { p.x - OFFSET };
    let y = if p.y < center.y { p.y + OFFSET } else { p.y - OFFSET };
    point(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use netdiag_core::geom::rect;

    #[test]
    fn side_by_side_nodes_meet_at_facing_edges() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(50.0, 0.0, 10.0, 10.0);
        assert_eq!(resolve_connection_point(&a, &b).unwrap(), point(10.0, 5.0));
        assert_eq!(resolve_connection_point(&b, &a).unwrap(), point(50.0, 5.0));
    }

    #[test]
    fn stacked_nodes_use_vertical_edges_with_offset() {
        let a = rect(0.0, 0.0, 40.0, 20.0);
        let b = rect(0.0, 100.0, 40.0, 20.0);
        assert_eq!(resolve_connection_point(&a, &b).unwrap(), point(20.0, 15.0));
        assert_eq!(resolve_connection_point(&b, &a).unwrap(), point(20.0, 105.0));
    }

    #[test]
    fn equal_displacement_goes_vertical() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(50.0, 50.0, 10.0, 10.0);
        let p = resolve_connection_point(&a, &b).unwrap();
        assert_eq!(p, point(5.0, 5.0));
    }

    #[test]
    fn far_diagonal_horizontal_link_is_nudged_off_the_corner() {
        let a = rect(0.0, 0.0, 20.0, 10.0);
        let b = rect(200.0, 100.0, 20.0, 10.0);
        // Horizontal wins (|dx| = 200 > |dy| = 100); y snaps to the bottom edge.
        let p = resolve_connection_point(&a, &b).unwrap();
        assert_eq!(p, point(15.0, 5.0));
    }

    fn strictly_inside(r: &Rect, p: Point) -> bool {
        p.x > r.min_x() && p.x < r.max_x() && p.y > r.min_y() && p.y < r.max_y()
    }

    #[test]
    fn points_stay_on_their_own_node_and_out_of_the_other() {
        let nodes = [
            rect(0.0, 0.0, 10.0, 10.0),
            rect(50.0, 0.0, 10.0, 10.0),
            rect(300.0, 300.0, 80.0, 30.0),
            rect(120.0, 40.0, 60.0, 60.0),
            rect(10.0, 200.0, 100.0, 20.0),
        ];
        for (i, a) in nodes.iter().enumerate() {
            for (j, b) in nodes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let p = resolve_connection_point(a, b).unwrap();
                assert!(!strictly_inside(b, p), "{p:?} inside {b:?}");
                assert!(
                    p.x >= a.min_x() && p.x <= a.max_x() && p.y >= a.min_y() && p.y <= a.max_y(),
                    "{p:?} outside {a:?}"
                );
            }
        }
    }

    #[test]
    fn non_finite_rectangles_are_rejected() {
        let a = rect(f64::NAN, 0.0, 10.0, 10.0);
        let b = rect(0.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            resolve_connection_point(&a, &b),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(resolve_connection_point(&b, &rect(0.0, 0.0, f64::INFINITY, 1.0)).is_err());
    }
}

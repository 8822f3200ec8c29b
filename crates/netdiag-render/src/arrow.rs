//! Filled arrow outline (shaft plus triangular head) between two points.

use crate::svg::fmt;
use crate::{Error, Result};
use netdiag_core::Rgb;
use netdiag_core::geom::{Point, point};
use std::fmt::Write as _;

pub const HEAD_LENGTH: f64 = 12.0;
pub const HEAD_HALF_WIDTH: f64 = 8.0;
pub const SHAFT_HALF_WIDTH: f64 = 4.0;

/// Seven-vertex closed outline; the tip is `vertices[3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowPolygon {
    pub vertices: [Point; 7],
}

impl ArrowPolygon {
    pub fn tip(&self) -> Point {
        self.vertices[3]
    }

    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.vertices.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", fmt(p.x), fmt(p.y));
        }
        d.push('Z');
        d
    }

    /// One `<path>` filled with `fill` and outlined with `stroke` at width 1.
    pub fn write_svg(&self, out: &mut String, fill: Rgb, stroke: Rgb) {
        let _ = write!(
            out,
            r#"<path d="{}" fill="{fill}" stroke="{stroke}" stroke-width="1"/>"#,
            self.path_data()
        );
    }
}

pub fn build_arrow_polygon(from: Point, to: Point) -> Result<ArrowPolygon> {
    for v in [from.x, from.y, to.x, to.y] {
        if !v.is_finite() {
            return Err(Error::InvalidArgument {
                message: format!("arrow coordinate is not finite: {v}"),
            });
        }
        if v < 0.0 {
            return Err(Error::InvalidArgument {
                message: format!("arrow coordinate cannot be negative: {v}"),
            });
        }
    }

    let angle = (to.y - from.y).atan2(to.x - from.x);
    let (sin, cos) = angle.sin_cos();

    let head_base = point(to.x - HEAD_LENGTH * cos, to.y - HEAD_LENGTH * sin);
    let side = |p: Point, half: f64| {
        (
            point(p.x - half * sin, p.y + half * cos),
            point(p.x + half * sin, p.y - half * cos),
        )
    };
    let (head_left, head_right) = side(head_base, HEAD_HALF_WIDTH);
    let (shaft_start_left, shaft_start_right) = side(from, SHAFT_HALF_WIDTH);
    let (shaft_end_left, shaft_end_right) = side(head_base, SHAFT_HALF_WIDTH);

    Ok(ArrowPolygon {
        vertices: [
            shaft_start_left,
            shaft_end_left,
            head_left,
            to,
            head_right,
            shaft_end_right,
            shaft_start_right,
        ],
    })
}

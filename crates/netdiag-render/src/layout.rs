//! Positioned output of a render pass.
//!
//! The input [`Diagram`] is never mutated; every position derived during a render (super-node
//! member placement, per-fragment frames) lives here.

use netdiag_core::Diagram;
use netdiag_core::geom::{Point, Rect};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Node id → absolute rectangle, seeded from the input and updated by super-node layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutTable {
    rects: FxHashMap<String, Rect>,
}

impl LayoutTable {
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let mut rects = FxHashMap::default();
        for node in &diagram.nodes {
            // First definition wins, matching id lookup on the input list.
            rects.entry(node.id.clone()).or_insert_with(|| node.rect());
        }
        Self { rects }
    }

    pub fn get(&self, id: &str) -> Option<&Rect> {
        self.rects.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rects.contains_key(id)
    }

    /// Moves a node, keeping its size. Returns `false` for unknown ids.
    pub fn move_to(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.rects.get_mut(id) {
            Some(r) => {
                r.origin.x = x;
                r.origin.y = y;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Integer canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentDimensions {
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuperNodeSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperNodeBox {
    pub id: String,
    pub label: String,
    pub x: i32,
    pub y: i32,
    pub size: SuperNodeSize,
}

/// A node drawn in its own frame: `origin` is the frame's document offset, `local` the node
/// rectangle relative to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFrame {
    pub id: String,
    pub origin: (i64, i64),
    pub width: i64,
    pub height: i64,
    pub local: Rect,
}

/// A link drawn in its own frame, endpoints relative to `origin`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkFrame {
    /// Index into [`Diagram::links`].
    pub link: usize,
    pub origin: (i64, i64),
    pub width: i64,
    pub height: i64,
    pub source_point: Point,
    pub target_point: Point,
}

/// Everything the SVG emitter needs, computed up front.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLayout {
    pub dimensions: DocumentDimensions,
    #[serde(skip)]
    pub nodes: LayoutTable,
    pub super_nodes: Vec<SuperNodeBox>,
    pub node_frames: Vec<NodeFrame>,
    pub link_frames: Vec<LinkFrame>,
}

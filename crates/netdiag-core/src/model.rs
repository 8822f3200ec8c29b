use crate::Error;
use crate::geom::{Rect, rect};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single rectangular entity. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            label: label.into(),
        }
    }

    pub fn rect(&self) -> Rect {
        rect(self.x, self.y, self.width, self.height)
    }
}

/// Side of a super-node a member node is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl NodeSide {
    /// Layout order used when positioning members.
    pub const ALL: [NodeSide; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Script arrow symbol: `^`, `v`, `<`, `>`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "^" => Some(Self::Top),
            "v" => Some(Self::Bottom),
            "<" => Some(Self::Left),
            ">" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn is_horizontal_row(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

impl FromStr for NodeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(Error::InvalidSide {
                value: s.to_string(),
            }),
        }
    }
}

/// A container that groups nodes on its four sides.
///
/// Only the position is input; the size and the member positions are derived on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperNode {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub label: String,
    /// Member node ids keyed by side, in insertion order.
    #[serde(default)]
    pub members: IndexMap<NodeSide, Vec<String>>,
}

impl SuperNode {
    pub fn new(id: impl Into<String>, x: i32, y: i32, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            label: label.into(),
            members: IndexMap::new(),
        }
    }

    pub fn add_member(&mut self, node_id: impl Into<String>, side: NodeSide) {
        self.members.entry(side).or_default().push(node_id.into());
    }

    pub fn with_member(mut self, node_id: impl Into<String>, side: NodeSide) -> Self {
        self.add_member(node_id, side);
        self
    }

    pub fn members_on(&self, side: NodeSide) -> &[String] {
        self.members.get(&side).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All member ids, sides visited top/bottom/left/right.
    pub fn member_ids(&self) -> impl Iterator<Item = &str> + '_ {
        NodeSide::ALL
            .into_iter()
            .flat_map(|side| self.members_on(side).iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids().next().is_none()
    }
}

/// A bidirectional traffic relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    /// Traffic from source to target, in percent.
    pub outgoing_traffic: f64,
    /// Traffic from target to source, in percent.
    pub incoming_traffic: f64,
}

impl Link {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        outgoing_traffic: f64,
        incoming_traffic: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            outgoing_traffic,
            incoming_traffic,
        }
    }
}

/// Validated input snapshot consumed by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub super_nodes: Vec<SuperNode>,
    pub links: Vec<Link>,
}

impl Diagram {
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn find_super_node_mut(&mut self, id: &str) -> Option<&mut SuperNode> {
        self.super_nodes.iter_mut().find(|s| s.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.super_nodes.is_empty() && self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parsing_accepts_names_and_symbols() {
        assert_eq!("TOP".parse::<NodeSide>().unwrap(), NodeSide::Top);
        assert_eq!(" right ".parse::<NodeSide>().unwrap(), NodeSide::Right);
        assert!(matches!(
            "middle".parse::<NodeSide>(),
            Err(Error::InvalidSide { .. })
        ));
        assert_eq!(NodeSide::from_symbol("v"), Some(NodeSide::Bottom));
        assert_eq!(NodeSide::from_symbol("*"), None);
    }

    #[test]
    fn member_ids_follow_side_order_not_insertion_order() {
        let sn = SuperNode::new("1", 0, 0, "core")
            .with_member("r", NodeSide::Right)
            .with_member("t1", NodeSide::Top)
            .with_member("t2", NodeSide::Top)
            .with_member("l", NodeSide::Left);
        let ids: Vec<&str> = sn.member_ids().collect();
        assert_eq!(ids, vec!["t1", "t2", "l", "r"]);
        assert!(sn.members_on(NodeSide::Bottom).is_empty());
        assert!(!sn.is_empty());
    }

    #[test]
    fn sides_serialize_uppercase() {
        let sn = SuperNode::new("1", 0, 0, "core").with_member("a", NodeSide::Left);
        let json = serde_json::to_string(&sn).unwrap();
        assert!(json.contains(r#""LEFT":["a"]"#), "{json}");
    }
}

//! JSON diagram command interpreter.

use crate::config::{DiagramConfig, DocumentStyle};
use crate::model::{Diagram, Link, Node, NodeSide, SuperNode};
use crate::validate::validate_diagram;
use crate::{ParsedDiagram, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<DiagramConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeJson>>,
    #[serde(
        default,
        rename = "superNodes",
        skip_serializing_if = "Option::is_none"
    )]
    pub super_nodes: Option<Vec<SuperNodeJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkJson>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionJson {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeJson {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeJson {
    pub id: String,
    pub position: PositionJson,
    pub size: SizeJson,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperNodeJson {
    pub id: String,
    pub position: PositionJson,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub node_positions: Vec<SuperNodePositionJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperNodePositionJson {
    pub node_id: String,
    pub position: NodeSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkJson {
    pub source_node_id: String,
    pub target_node_id: String,
    /// Source to target.
    #[serde(default)]
    pub tx_traffic: f64,
    /// Target to source.
    #[serde(default)]
    pub rx_traffic: f64,
}

pub fn parse_json(text: &str) -> Result<ParsedDiagram> {
    let command: DiagramCommand = serde_json::from_str(text)?;
    interpret_command(command)
}

/// Translates a command into a validated diagram plus its resolved style.
pub fn interpret_command(command: DiagramCommand) -> Result<ParsedDiagram> {
    let mut diagram = Diagram::default();

    for n in command.nodes.unwrap_or_default() {
        diagram.nodes.push(Node::new(
            n.id,
            n.position.x,
            n.position.y,
            n.size.width,
            n.size.height,
            n.label,
        ));
    }

    for l in command.links.unwrap_or_default() {
        diagram.links.push(Link::new(
            l.source_node_id,
            l.target_node_id,
            l.tx_traffic,
            l.rx_traffic,
        ));
    }

    for s in command.super_nodes.unwrap_or_default() {
        let mut sn = SuperNode::new(s.id, s.position.x as i32, s.position.y as i32, s.label);
        for placement in s.node_positions {
            // Unknown ids are dropped here; an emptied super node fails validation below.
            if diagram.find_node(&placement.node_id).is_none() {
                tracing::debug!(node_id = %placement.node_id, super_node = %sn.id, "ignoring unknown member");
                continue;
            }
            sn.add_member(placement.node_id, placement.position);
        }
        diagram.super_nodes.push(sn);
    }

    validate_diagram(&diagram)?;

    let style = match command.config {
        Some(cfg) => cfg.into_style()?,
        None => DocumentStyle::default(),
    };

    tracing::debug!(
        nodes = diagram.nodes.len(),
        super_nodes = diagram.super_nodes.len(),
        links = diagram.links.len(),
        "interpreted diagram command"
    );
    Ok(ParsedDiagram { diagram, style })
}

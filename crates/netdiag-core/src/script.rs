//! Line-oriented diagram script.
//!
//! ```text
//! Node N1: Position(10, 20), Size(100, 40), Label("Router")
//! Node N2: Position(300, 20), Size(100, 40), Label("Switch")
//! SuperNode SN1: Position(150, 200), Label("Rack")
//! N1 ---[75,12.5]--> N2
//! N1 --^--> SN1
//! ```
//!
//! Membership symbols: `^` top, `v` bottom, `<` left, `>` right. Blank lines and lines
//! starting with `#` or `%%` are skipped.

use crate::config::DocumentStyle;
use crate::model::{Diagram, Link, Node, NodeSide, SuperNode};
use crate::validate::validate_diagram;
use crate::{Error, ParsedDiagram, Result};
use regex::{Captures, Regex};
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct ScriptParser {
    node: Regex,
    super_node: Regex,
    link: Regex,
    membership: Regex,
}

impl Default for ScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptParser {
    pub fn new() -> Self {
        Self {
            node: Regex::new(
                r#"Node N(\d+): Position\(([^,]+), ([^)]+)\), Size\(([^,]+), ([^)]+)\), Label\("([^"]+)"\)"#,
            )
            .expect("node regex must compile"),
            super_node: Regex::new(
                r#"SuperNode SN(\d+): Position\(([^,]+), ([^)]+)\), Label\("([^"]+)"\)"#,
            )
            .expect("super node regex must compile"),
            link: Regex::new(r"N(\d+) ---\[([^,]+),([^\]]+)\]--> N(\d+)")
                .expect("link regex must compile"),
            membership: Regex::new(r"N(\d+) --([^-\s]*)--> SN(\d+)")
                .expect("membership regex must compile"),
        }
    }

    /// Parses and validates a whole script. Script input has no config block, so the style is
    /// [`DocumentStyle::script_defaults`].
    pub fn parse(&self, text: &str) -> Result<ParsedDiagram> {
        let mut diagram = Diagram::default();
        let mut lines = 0usize;
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("%%") {
                continue;
            }
            lines += 1;
            self.parse_line(idx + 1, line, &mut diagram)?;
        }
        tracing::debug!(lines, "interpreted script");

        validate_diagram(&diagram)?;
        Ok(ParsedDiagram {
            diagram,
            style: DocumentStyle::script_defaults(),
        })
    }

    fn parse_line(&self, line_no: usize, line: &str, diagram: &mut Diagram) -> Result<()> {
        if let Some(caps) = self.node.captures(line) {
            let num = |i: usize| number(&caps, i, line_no);
            diagram
                .nodes
                .push(Node::new(&caps[1], num(2)?, num(3)?, num(4)?, num(5)?, &caps[6]));
            return Ok(());
        }

        if let Some(caps) = self.link.captures(line) {
            let outgoing = number(&caps, 2, line_no)?;
            let incoming = number(&caps, 3, line_no)?;
            diagram
                .links
                .push(Link::new(&caps[1], &caps[4], outgoing, incoming));
            return Ok(());
        }

        if let Some(caps) = self.super_node.captures(line) {
            let x = number(&caps, 2, line_no)? as i32;
            let y = number(&caps, 3, line_no)? as i32;
            diagram
                .super_nodes
                .push(SuperNode::new(&caps[1], x, y, &caps[4]));
            return Ok(());
        }

        if let Some(caps) = self.membership.captures(line) {
            return attach_member(line, &caps[1], &caps[2], &caps[3], diagram);
        }

        tracing::error!(line = line_no, content = %line, "unrecognized script line");
        Err(Error::ScriptParse {
            line: line_no,
            content: line.to_string(),
        })
    }
}

fn number(caps: &Captures<'_>, group: usize, line: usize) -> Result<f64> {
    let raw = caps[group].trim();
    raw.parse::<f64>().map_err(|_| Error::InvalidNumber {
        line,
        value: raw.to_string(),
    })
}

fn attach_member(
    line: &str,
    node_id: &str,
    symbol: &str,
    super_node_id: &str,
    diagram: &mut Diagram,
) -> Result<()> {
    let side = if symbol.is_empty() {
        None
    } else {
        Some(
            NodeSide::from_symbol(symbol).ok_or_else(|| Error::InvalidSide {
                value: symbol.to_string(),
            })?,
        )
    };

    let node_known = diagram.find_node(node_id).is_some();
    let Some(sn) = diagram.find_super_node_mut(super_node_id) else {
        return Err(Error::UnknownSuperNode {
            id: super_node_id.to_string(),
        });
    };
    if !node_known {
        return Err(Error::UnknownNode {
            id: node_id.to_string(),
        });
    }

    match side {
        Some(side) => sn.add_member(node_id, side),
        None => tracing::warn!(content = %line, "no position symbol, membership ignored"),
    }
    Ok(())
}

pub fn parse_script(text: &str) -> Result<ParsedDiagram> {
    static PARSER: OnceLock<ScriptParser> = OnceLock::new();
    PARSER.get_or_init(ScriptParser::new).parse(text)
}

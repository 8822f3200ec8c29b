//! Referential integrity checks shared by both input interpreters.

use crate::model::{Diagram, SuperNode};
use crate::{Error, Result};
use rustc_hash::FxHashSet;

/// Rejects duplicate ids, dangling links and conflicting super-node membership.
pub fn validate_diagram(diagram: &Diagram) -> Result<()> {
    let mut node_ids: FxHashSet<&str> = FxHashSet::default();
    for node in &diagram.nodes {
        if !node_ids.insert(node.id.as_str()) {
            tracing::error!(id = %node.id, "duplicate node id");
            return Err(Error::DuplicateNode {
                id: node.id.clone(),
            });
        }
    }

    let mut super_node_ids: FxHashSet<&str> = FxHashSet::default();
    for sn in &diagram.super_nodes {
        if !super_node_ids.insert(sn.id.as_str()) {
            tracing::error!(id = %sn.id, "duplicate super node id");
            return Err(Error::DuplicateSuperNode { id: sn.id.clone() });
        }
    }

    for link in &diagram.links {
        if !node_ids.contains(link.source.as_str()) || !node_ids.contains(link.target.as_str()) {
            tracing::error!(
                source = %link.source,
                target = %link.target,
                "link between non-existing nodes"
            );
            return Err(Error::DanglingLink {
                from: link.source.clone(),
                to: link.target.clone(),
            });
        }
    }

    let mut claimed: FxHashSet<&str> = FxHashSet::default();
    for sn in &diagram.super_nodes {
        validate_members(sn, &node_ids, &mut claimed)?;
    }

    Ok(())
}

fn validate_members<'a>(
    sn: &'a SuperNode,
    node_ids: &FxHashSet<&str>,
    claimed: &mut FxHashSet<&'a str>,
) -> Result<()> {
    let mut local: FxHashSet<&str> = FxHashSet::default();
    for node_id in sn.member_ids() {
        if !node_ids.contains(node_id) {
            tracing::error!(node_id, super_node = %sn.id, "unknown node in super node");
            return Err(Error::UnknownMember {
                node_id: node_id.to_string(),
                super_node_id: sn.id.clone(),
            });
        }
        if !local.insert(node_id) {
            tracing::error!(node_id, super_node = %sn.id, "duplicate node in super node");
            return Err(Error::DuplicateMember {
                node_id: node_id.to_string(),
                super_node_id: sn.id.clone(),
            });
        }
        if !claimed.insert(node_id) {
            tracing::error!(node_id, "node in multiple super nodes");
            return Err(Error::MemberOfMultiple {
                node_id: node_id.to_string(),
            });
        }
    }

    if local.is_empty() {
        tracing::error!(id = %sn.id, "empty super node");
        return Err(Error::EmptySuperNode { id: sn.id.clone() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Link, Node, NodeSide};

    fn two_nodes() -> Diagram {
        Diagram {
            nodes: vec![
                Node::new("1", 0.0, 0.0, 10.0, 10.0, "a"),
                Node::new("2", 50.0, 0.0, 10.0, 10.0, "b"),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn accepts_consistent_diagram() {
        let mut d = two_nodes();
        d.links.push(Link::new("1", "2", 10.0, 20.0));
        d.super_nodes
            .push(SuperNode::new("s", 0, 0, "S").with_member("1", NodeSide::Top));
        validate_diagram(&d).unwrap();
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let mut d = two_nodes();
        d.nodes.push(Node::new("1", 5.0, 5.0, 1.0, 1.0, "dup"));
        assert!(matches!(
            validate_diagram(&d),
            Err(Error::DuplicateNode { id }) if id == "1"
        ));
    }

    #[test]
    fn rejects_dangling_links() {
        let mut d = two_nodes();
        d.links.push(Link::new("1", "9", 0.0, 0.0));
        assert!(matches!(
            validate_diagram(&d),
            Err(Error::DanglingLink { from, to }) if from == "1" && to == "9"
        ));
    }

    #[test]
    fn rejects_membership_conflicts() {
        let mut d = two_nodes();
        d.super_nodes.push(
            SuperNode::new("s", 0, 0, "S")
                .with_member("1", NodeSide::Top)
                .with_member("1", NodeSide::Left),
        );
        assert!(matches!(
            validate_diagram(&d),
            Err(Error::DuplicateMember { .. })
        ));

        let mut d = two_nodes();
        d.super_nodes
            .push(SuperNode::new("s", 0, 0, "S").with_member("1", NodeSide::Top));
        d.super_nodes
            .push(SuperNode::new("t", 0, 0, "T").with_member("1", NodeSide::Top));
        assert!(matches!(
            validate_diagram(&d),
            Err(Error::MemberOfMultiple { node_id }) if node_id == "1"
        ));

        let mut d = two_nodes();
        d.super_nodes
            .push(SuperNode::new("s", 0, 0, "S").with_member("7", NodeSide::Top));
        assert!(matches!(
            validate_diagram(&d),
            Err(Error::UnknownMember { .. })
        ));
    }

    #[test]
    fn rejects_empty_super_node_and_duplicate_super_ids() {
        let mut d = two_nodes();
        d.super_nodes.push(SuperNode::new("s", 0, 0, "S"));
        assert!(matches!(
            validate_diagram(&d),
            Err(Error::EmptySuperNode { .. })
        ));

        let mut d = two_nodes();
        d.super_nodes
            .push(SuperNode::new("s", 0, 0, "S").with_member("1", NodeSide::Top));
        d.super_nodes
            .push(SuperNode::new("s", 0, 0, "S").with_member("2", NodeSide::Top));
        assert!(matches!(
            validate_diagram(&d),
            Err(Error::DuplicateSuperNode { .. })
        ));
    }
}

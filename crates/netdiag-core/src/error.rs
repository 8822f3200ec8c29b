pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Diagram command JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Script parse error on line {line}: {content}")]
    ScriptParse { line: usize, content: String },

    #[error("Invalid number `{value}` on line {line}")]
    InvalidNumber { line: usize, value: String },

    #[error("Invalid node side: {value}")]
    InvalidSide { value: String },

    #[error("SuperNode with ID {id} not found")]
    UnknownSuperNode { id: String },

    #[error("Node with ID {id} not found")]
    UnknownNode { id: String },

    #[error("Duplicate Node ID: {id}")]
    DuplicateNode { id: String },

    #[error("Duplicate SuperNode ID: {id}")]
    DuplicateSuperNode { id: String },

    #[error("Invalid link between non-existing nodes: {from} --> {to}")]
    DanglingLink { from: String, to: String },

    #[error("Invalid node in SuperNode: Node ID {node_id} in SuperNode {super_node_id}")]
    UnknownMember {
        node_id: String,
        super_node_id: String,
    },

    #[error("Duplicate node in SuperNode: Node ID {node_id} in SuperNode {super_node_id}")]
    DuplicateMember {
        node_id: String,
        super_node_id: String,
    },

    #[error("Node in multiple SuperNodes: Node ID {node_id}")]
    MemberOfMultiple { node_id: String },

    #[error("Empty SuperNode: SuperNode ID {id}")]
    EmptySuperNode { id: String },

    #[error("Unknown link color palette: {value}")]
    UnknownPalette { value: String },

    #[error("Invalid hex color for `{field}`: {value}")]
    InvalidColor { field: &'static str, value: String },
}

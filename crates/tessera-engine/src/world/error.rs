use thiserror::Error;

use crate::resources::ResourceError;

use super::NodeId;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("field `{field}` has malformed value {value:?}: {reason}")]
    Malformed { field: String, value: String, reason: String },
    #[error("unknown node type `{0}`")]
    UnknownType(String),
    #[error("duplicate node id {0}")]
    DuplicateId(NodeId),
    #[error("node {0} does not exist")]
    NoSuchNode(NodeId),
    #[error("node {node} refers to missing parent {parent}")]
    DanglingParent { node: NodeId, parent: NodeId },
    #[error("parenting {node} under {parent} would create a cycle")]
    Cycle { node: NodeId, parent: NodeId },
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

//! Graph vertex wrapping a tensor descriptor.

use super::info::NdArrayInformation;
use super::{EdgeId, VertexId};

/// A vertex in the computation graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdArrayVertex {
    id: VertexId,
    value: NdArrayInformation,
    op_state: Option<EdgeId>,
}

impl NdArrayVertex {
    pub(super) fn new(id: VertexId, value: NdArrayInformation) -> Self {
        Self {
            id,
            value,
            op_state: None,
        }
    }

    /// Graph-assigned identity.
    pub fn vertex_id(&self) -> VertexId {
        self.id
    }

    /// The tensor this vertex represents.
    pub fn value(&self) -> &NdArrayInformation {
        &self.value
    }

    /// Edge of the operation that computed this vertex (`None` for leaves).
    pub fn op_state(&self) -> Option<EdgeId> {
        self.op_state
    }

    /// Check if this vertex is a graph input.
    pub fn is_leaf(&self) -> bool {
        self.op_state.is_none()
    }

    /// Link the producing operation and its result descriptor together.
    pub(super) fn attach(&mut self, edge: EdgeId) {
        self.op_state = Some(edge);
        self.value.set_owner(edge);
    }
}

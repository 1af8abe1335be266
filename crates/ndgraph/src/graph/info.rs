//! Tensor descriptor stored on each graph vertex.

use super::EdgeId;
use crate::shape::{Shape, product};

/// Description of one tensor slot in the graph.
///
/// The id and shape are fixed when the descriptor is created. The owner is
/// the edge carrying the [`super::OpState`] that produced this tensor; it is
/// attached by the graph in the same call that inserts the edge and is
/// `None` for leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdArrayInformation {
    id: String,
    shape: Shape,
    owner: Option<EdgeId>,
}

impl NdArrayInformation {
    /// Create a descriptor with no owner.
    pub fn new(id: impl Into<String>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            shape,
            owner: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Edge of the producing operation, if any.
    pub fn owner(&self) -> Option<EdgeId> {
        self.owner
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        product(&self.shape)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn set_owner(&mut self, owner: EdgeId) {
        debug_assert!(self.owner.is_none(), "descriptor owner is set once");
        self.owner = Some(owner);
    }
}

//! Values a differentiable function can expose to its consumers.

use crate::graph::{EdgeId, VertexId};
use crate::shape::Shape;
use std::cell::{Cell, RefCell};

/// A tensor that already has a vertex in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayField {
    vertex: VertexId,
    id: String,
    shape: Shape,
}

impl ArrayField {
    pub fn new(vertex: VertexId, id: impl Into<String>, shape: Shape) -> Self {
        Self {
            vertex,
            id: id.into(),
            shape,
        }
    }

    pub fn vertex_id(&self) -> VertexId {
        self.vertex
    }

    /// Descriptor id of the tensor.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
}

/// Current value of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Shape and vertex are known.
    Array(ArrayField),
    /// Not yet placed in the graph.
    Symbolic,
}

impl Value {
    pub fn as_array(&self) -> Option<&ArrayField> {
        match self {
            Value::Array(field) => Some(field),
            Value::Symbolic => None,
        }
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self, Value::Array(_))
    }
}

/// Construction state of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construction {
    /// Waiting for an operand to be materialized.
    Deferred,
    /// Placed in the graph. `op_state` is `None` for leaves.
    Built {
        vertex: VertexId,
        op_state: Option<EdgeId>,
    },
}

/// Interior-mutable construction record shared by all function variants.
///
/// Filled at most once, by the function's own graph construction.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    value: RefCell<Option<ArrayField>>,
    op_state: Cell<Option<EdgeId>>,
}

impl Slot {
    pub(crate) fn value(&self) -> Value {
        match &*self.value.borrow() {
            Some(field) => Value::Array(field.clone()),
            None => Value::Symbolic,
        }
    }

    pub(crate) fn is_built(&self) -> bool {
        self.value.borrow().is_some()
    }

    pub(crate) fn op_state(&self) -> Option<EdgeId> {
        self.op_state.get()
    }

    pub(crate) fn construction(&self) -> Construction {
        match &*self.value.borrow() {
            Some(field) => Construction::Built {
                vertex: field.vertex_id(),
                op_state: self.op_state.get(),
            },
            None => Construction::Deferred,
        }
    }

    pub(crate) fn fill(&self, field: ArrayField, op_state: Option<EdgeId>) {
        debug_assert!(!self.is_built(), "construction slot is filled once");
        self.op_state.set(op_state);
        *self.value.borrow_mut() = Some(field);
    }
}

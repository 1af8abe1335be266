//! Operation records carried on graph edges.

use super::VertexId;
use std::fmt;

/// Category of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    /// Reduces one or more axes (sum, mean, max, ...).
    Accumulation,
    /// Reduces axes to an index (argmax, ...).
    IndexAccumulation,
    /// Elementwise unary operation.
    Transform,
    /// Elementwise binary operation on equally shaped operands.
    Pairwise,
    /// Operation between a tensor and a scalar.
    Scalar,
    /// Operation broadcasting a smaller operand.
    Broadcast,
    /// Reshape, permute and friends.
    Shape,
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpType::Accumulation => "ACCUMULATION",
            OpType::IndexAccumulation => "INDEX_ACCUMULATION",
            OpType::Transform => "TRANSFORM",
            OpType::Pairwise => "PAIRWISE",
            OpType::Scalar => "SCALAR",
            OpType::Broadcast => "BROADCAST",
            OpType::Shape => "SHAPE",
        };
        f.write_str(name)
    }
}

/// One applied operation, the instruction record of the IR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpState {
    op_type: OpType,
    op_name: String,
    id: String,
    axes: Vec<usize>,
    /// Operand vertices followed by the result vertex.
    vertex_ids: Vec<String>,
    /// Element count of the result.
    n: usize,
    result: Option<VertexId>,
}

impl OpState {
    pub(crate) fn new(
        op_type: OpType,
        op_name: impl Into<String>,
        id: impl Into<String>,
        axes: Vec<usize>,
        vertex_ids: Vec<String>,
        n: usize,
    ) -> Self {
        Self {
            op_type,
            op_name: op_name.into(),
            id: id.into(),
            axes,
            vertex_ids,
            n,
            result: None,
        }
    }

    pub fn op_type(&self) -> OpType {
        self.op_type
    }

    pub fn op_name(&self) -> &str {
        &self.op_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn axes(&self) -> &[usize] {
        &self.axes
    }

    pub fn vertex_ids(&self) -> &[String] {
        &self.vertex_ids
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Vertex holding the result descriptor.
    pub fn result(&self) -> Option<VertexId> {
        self.result
    }

    pub(super) fn set_result(&mut self, result: VertexId) {
        self.result = Some(result);
    }
}

/// Edge payload: an operation state plus its direction flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    op_state: OpState,
    forward: bool,
}

impl Edge {
    pub fn new(op_state: OpState, forward: bool) -> Self {
        Self { op_state, forward }
    }

    pub fn op_state(&self) -> &OpState {
        &self.op_state
    }

    /// `true` for edges pointing from operand to result.
    pub fn is_forward(&self) -> bool {
        self.forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_type_display() {
        assert_eq!(OpType::Accumulation.to_string(), "ACCUMULATION");
        assert_eq!(OpType::Pairwise.to_string(), "PAIRWISE");
    }

    #[test]
    fn test_new_op_state_has_no_result() {
        let state = OpState::new(
            OpType::Accumulation,
            "sum",
            "sum(x -> sum(x -> x))",
            vec![1],
            vec!["0".to_string(), "1".to_string()],
            8,
        );
        assert_eq!(state.op_name(), "sum");
        assert_eq!(state.axes(), &[1]);
        assert_eq!(state.n(), 8);
        assert!(state.result().is_none());
    }
}

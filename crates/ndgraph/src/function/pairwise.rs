//! Elementwise binary operations on equally shaped operands.

use super::{
    ArrayField, Construction, Differentiable, Function, FunctionRef, Slot, Value, materialized,
};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, Graph, NewOperation, OpType};
use crate::shape::{product, shape_of};
use std::rc::Rc;

/// Kind of elementwise binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairwiseOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl PairwiseOp {
    pub fn name(&self) -> &'static str {
        match self {
            PairwiseOp::Add => "add",
            PairwiseOp::Sub => "sub",
            PairwiseOp::Mul => "mul",
            PairwiseOp::Div => "div",
        }
    }

    /// Infix symbol used in formulas.
    pub fn symbol(&self) -> &'static str {
        match self {
            PairwiseOp::Add => "+",
            PairwiseOp::Sub => "-",
            PairwiseOp::Mul => "*",
            PairwiseOp::Div => "/",
        }
    }
}

/// Elementwise binary function.
///
/// Both operands must have the same shape. The result vertex gets one
/// incoming edge per operand; the left edge owns the result descriptor.
/// Operands are named by vertex index in the result id, so the id stays
/// short when both sides share a subgraph.
#[derive(Debug)]
pub struct PairwiseFunction {
    op: PairwiseOp,
    lhs: FunctionRef,
    rhs: FunctionRef,
    slot: Slot,
}

impl PairwiseFunction {
    pub fn new(
        graph: &mut Graph,
        op: PairwiseOp,
        lhs: &FunctionRef,
        rhs: &FunctionRef,
    ) -> Result<FunctionRef> {
        let function = Rc::new(Function::Pairwise(Self {
            op,
            lhs: Rc::clone(lhs),
            rhs: Rc::clone(rhs),
            slot: Slot::default(),
        }));
        function.build_graph_node(graph)?;
        Ok(function)
    }

    pub fn op(&self) -> PairwiseOp {
        self.op
    }

    pub fn lhs(&self) -> &FunctionRef {
        &self.lhs
    }

    pub fn rhs(&self) -> &FunctionRef {
        &self.rhs
    }
}

impl Differentiable for PairwiseFunction {
    fn function_name(&self) -> &str {
        self.op.name()
    }

    fn value(&self) -> Value {
        self.slot.value()
    }

    fn op_state(&self) -> Option<EdgeId> {
        self.slot.op_state()
    }

    fn construction(&self) -> Construction {
        self.slot.construction()
    }

    fn formula(&self) -> String {
        format!(
            "({} {} {})",
            self.lhs.formula(),
            self.op.symbol(),
            self.rhs.formula()
        )
    }

    fn formula_with(&self, variables: &mut Vec<String>) -> String {
        let lhs = self.lhs.formula_with(variables);
        let rhs = self.rhs.formula_with(variables);
        format!("({lhs} {} {rhs})", self.op.symbol())
    }

    fn operands(&self) -> Vec<FunctionRef> {
        vec![Rc::clone(&self.lhs), Rc::clone(&self.rhs)]
    }

    fn build_graph_node(&self, graph: &mut Graph) -> Result<bool> {
        if self.slot.is_built() {
            return Ok(true);
        }
        let Some(lhs) = materialized(graph, &self.lhs)? else {
            return Ok(false);
        };
        let Some(rhs) = materialized(graph, &self.rhs)? else {
            return Ok(false);
        };
        if lhs.shape() != rhs.shape() {
            return Err(GraphError::ShapeMismatch {
                lhs: lhs.shape().to_vec(),
                rhs: rhs.shape().to_vec(),
            });
        }

        let shape = shape_of(lhs.shape());
        let input_id = format!("{},{}", lhs.vertex_id(), rhs.vertex_id());
        let added = graph.add_operation(NewOperation {
            op_type: OpType::Pairwise,
            op_name: self.op.name(),
            input_id: &input_id,
            inputs: &[lhs.vertex_id(), rhs.vertex_id()],
            axes: &[],
            shape: shape.clone(),
            n: product(&shape),
        })?;
        self.slot.fill(
            ArrayField::new(added.vertex, added.result_id, shape),
            Some(added.edge),
        );
        Ok(true)
    }
}

//! Elementwise unary operations.

use super::{
    ArrayField, Construction, Differentiable, Function, FunctionRef, Slot, Value, materialized,
};
use crate::error::Result;
use crate::graph::{EdgeId, Graph, NewOperation, OpType};
use crate::shape::{product, shape_of};
use std::rc::Rc;

/// Kind of elementwise unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformOp {
    Neg,
    Abs,
    Exp,
    Log,
    Sqrt,
    Tanh,
    Sigmoid,
    Relu,
}

impl TransformOp {
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::Neg => "neg",
            TransformOp::Abs => "abs",
            TransformOp::Exp => "exp",
            TransformOp::Log => "log",
            TransformOp::Sqrt => "sqrt",
            TransformOp::Tanh => "tanh",
            TransformOp::Sigmoid => "sigmoid",
            TransformOp::Relu => "relu",
        }
    }
}

/// Elementwise unary function; the result has the operand's shape.
#[derive(Debug)]
pub struct TransformFunction {
    op: TransformOp,
    operand: FunctionRef,
    slot: Slot,
}

impl TransformFunction {
    pub fn new(graph: &mut Graph, op: TransformOp, operand: &FunctionRef) -> Result<FunctionRef> {
        let function = Rc::new(Function::Transform(Self {
            op,
            operand: Rc::clone(operand),
            slot: Slot::default(),
        }));
        function.build_graph_node(graph)?;
        Ok(function)
    }

    pub fn op(&self) -> TransformOp {
        self.op
    }

    pub fn arg(&self) -> &FunctionRef {
        &self.operand
    }
}

impl Differentiable for TransformFunction {
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
        format!("{}({})", self.op.name(), self.operand.formula())
    }

    fn formula_with(&self, variables: &mut Vec<String>) -> String {
        format!("{}({})", self.op.name(), self.operand.formula_with(variables))
    }

    fn operands(&self) -> Vec<FunctionRef> {
        vec![Rc::clone(&self.operand)]
    }

    fn build_graph_node(&self, graph: &mut Graph) -> Result<bool> {
        if self.slot.is_built() {
            return Ok(true);
        }
        let Some(input) = materialized(graph, &self.operand)? else {
            return Ok(false);
        };

        let shape = shape_of(input.shape());
        let added = graph.add_operation(NewOperation {
            op_type: OpType::Transform,
            op_name: self.op.name(),
            input_id: input.id(),
            inputs: &[input.vertex_id()],
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

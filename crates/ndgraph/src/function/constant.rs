//! Scalar constants.

use super::{ArrayField, Construction, Differentiable, Function, FunctionRef, Slot, Value};
use crate::error::Result;
use crate::graph::{EdgeId, Graph, NdArrayInformation};
use crate::shape::Shape;
use std::rc::Rc;

/// A scalar constant, placed in the graph as a rank-0 leaf.
#[derive(Debug)]
pub struct Constant {
    value: f64,
    name: String,
    slot: Slot,
}

impl Constant {
    pub fn new(graph: &mut Graph, value: f64) -> FunctionRef {
        let name = value.to_string();
        let vertex = graph.add_vertex(NdArrayInformation::new(name.clone(), Shape::new()));
        let slot = Slot::default();
        slot.fill(ArrayField::new(vertex, name.clone(), Shape::new()), None);
        Rc::new(Function::Constant(Self { value, name, slot }))
    }
}

impl Differentiable for Constant {
    fn function_name(&self) -> &str {
        &self.name
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
        self.name.clone()
    }

    fn formula_with(&self, _variables: &mut Vec<String>) -> String {
        self.name.clone()
    }

    fn operands(&self) -> Vec<FunctionRef> {
        Vec::new()
    }

    fn build_graph_node(&self, _graph: &mut Graph) -> Result<bool> {
        Ok(true)
    }

    fn real_value(&self) -> Result<f64> {
        Ok(self.value)
    }
}

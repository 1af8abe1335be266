//! Named input variables.

use super::{ArrayField, Construction, Differentiable, Function, FunctionRef, Slot, Value};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, Graph, NdArrayInformation, VertexId};
use crate::shape::shape_of;
use log::debug;
use std::rc::Rc;

/// A named graph input.
///
/// A variable is either materialized (it has a leaf vertex with a known
/// shape) or symbolic (its shape is not known yet). Symbolic variables are
/// bound later with [`Variable::bind`].
///
/// # Example
///
/// ```
/// use ndgraph::function::{Differentiable, Variable};
/// use ndgraph::Graph;
///
/// let mut graph = Graph::new();
/// let x = Variable::symbolic("x");
/// assert!(!x.value().is_materialized());
///
/// x.bind(&mut graph, &[2, 3]).unwrap();
/// assert_eq!(x.value().as_array().unwrap().shape(), &[2, 3]);
/// ```
#[derive(Debug)]
pub struct Variable {
    name: String,
    slot: Slot,
}

impl Variable {
    /// Create a variable with a leaf vertex of the given shape.
    pub fn materialized(graph: &mut Graph, name: impl Into<String>, shape: &[usize]) -> FunctionRef {
        let variable = Self {
            name: name.into(),
            slot: Slot::default(),
        };
        variable.place(graph, shape);
        Rc::new(Function::Variable(variable))
    }

    /// Create a variable whose shape is not known yet.
    pub fn symbolic(name: impl Into<String>) -> FunctionRef {
        Rc::new(Function::Variable(Self {
            name: name.into(),
            slot: Slot::default(),
        }))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Give a symbolic variable its leaf vertex.
    pub fn bind(&self, graph: &mut Graph, shape: &[usize]) -> Result<VertexId> {
        if self.slot.is_built() {
            return Err(GraphError::AlreadyMaterialized {
                name: self.name.clone(),
            });
        }
        debug!("Binding variable {} to shape {shape:?}", self.name);
        Ok(self.place(graph, shape))
    }

    fn place(&self, graph: &mut Graph, shape: &[usize]) -> VertexId {
        let shape = shape_of(shape);
        let vertex = graph.add_vertex(NdArrayInformation::new(self.name.clone(), shape.clone()));
        self.slot
            .fill(ArrayField::new(vertex, self.name.clone(), shape), None);
        vertex
    }
}

impl Differentiable for Variable {
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

    fn formula_with(&self, variables: &mut Vec<String>) -> String {
        if !variables.contains(&self.name) {
            variables.push(self.name.clone());
        }
        self.name.clone()
    }

    fn operands(&self) -> Vec<FunctionRef> {
        Vec::new()
    }

    /// Variables are placed by [`Variable::bind`], never by construction.
    fn build_graph_node(&self, _graph: &mut Graph) -> Result<bool> {
        Ok(self.slot.is_built())
    }
}

//! Differentiable functions: symbolic expression nodes that build the graph.
//!
//! # Architecture
//!
//! ```text
//! FunctionRef = Rc<Function>  ──constructs──►  Graph (explicit &mut handle)
//!        │                                        │
//!        ▼                                        ▼
//!   Function::{Variable, Constant,         NdArrayVertex ◄── Edge(OpState)
//!              Reduce, Transform,
//!              Pairwise}
//!        │
//!        ▼
//!   Slot (value + op_state, filled once)
//! ```
//!
//! Constructing an operation function registers its vertex and edge right
//! away. If an operand has no concrete shape yet, the function stays
//! [`Construction::Deferred`] and [`Function::resolve`] finishes the job once
//! the operand is bound.
//!
//! # Example
//!
//! ```
//! use ndgraph::function::{Differentiable, Variable, ops};
//! use ndgraph::Graph;
//!
//! let mut graph = Graph::new();
//! let x = Variable::materialized(&mut graph, "x", &[4, 3, 2]);
//! let s = ops::sum(&mut graph, &x, &[1]).unwrap();
//!
//! assert_eq!(s.formula(), "sum(x,axes:[1])");
//! assert_eq!(s.value().as_array().unwrap().shape(), &[4, 2]);
//! assert_eq!(graph.vertex_count(), 2);
//! ```

mod constant;
pub mod ops;
mod pairwise;
mod reduce;
mod transform;
mod value;
mod variable;

pub use constant::Constant;
pub use pairwise::{PairwiseFunction, PairwiseOp};
pub use reduce::{ReduceBuilder, ReduceFunction, ReduceOp};
pub use transform::{TransformFunction, TransformOp};
pub use value::{ArrayField, Construction, Value};
pub use variable::Variable;

pub(crate) use value::Slot;

use crate::config::DeferPolicy;
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, Graph, VertexId};
use log::debug;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a function. Operands may feed many consumers.
pub type FunctionRef = Rc<Function>;

/// Capabilities every function variant provides.
pub trait Differentiable {
    /// Operation name, or the variable name for leaves.
    fn function_name(&self) -> &str;

    /// Current value; `Value::Symbolic` until the function has a vertex.
    fn value(&self) -> Value;

    /// Edge of the operation state created for this function.
    fn op_state(&self) -> Option<EdgeId>;

    fn construction(&self) -> Construction;

    /// Render the expression.
    fn formula(&self) -> String;

    /// Render the expression, recording each variable name in `variables`
    /// the first time it is seen.
    fn formula_with(&self, variables: &mut Vec<String>) -> String;

    /// Operand functions, in order.
    fn operands(&self) -> Vec<FunctionRef>;

    /// Try to place this function in the graph.
    ///
    /// Returns `Ok(true)` once the function has a vertex and `Ok(false)`
    /// while an operand is still symbolic.
    fn build_graph_node(&self, graph: &mut Graph) -> Result<bool>;

    /// Scalar value of the function, for functions that have one.
    fn real_value(&self) -> Result<f64> {
        Err(GraphError::unsupported("real_value", self.formula()))
    }
}

/// Closed set of function variants.
#[derive(Debug)]
pub enum Function {
    Variable(Variable),
    Constant(Constant),
    Reduce(ReduceFunction),
    Transform(TransformFunction),
    Pairwise(PairwiseFunction),
}

macro_rules! dispatch {
    ($self:ident, $f:ident => $body:expr) => {
        match $self {
            Function::Variable($f) => $body,
            Function::Constant($f) => $body,
            Function::Reduce($f) => $body,
            Function::Transform($f) => $body,
            Function::Pairwise($f) => $body,
        }
    };
}

impl Differentiable for Function {
    fn function_name(&self) -> &str {
        dispatch!(self, f => f.function_name())
    }

    fn value(&self) -> Value {
        dispatch!(self, f => f.value())
    }

    fn op_state(&self) -> Option<EdgeId> {
        dispatch!(self, f => f.op_state())
    }

    fn construction(&self) -> Construction {
        dispatch!(self, f => f.construction())
    }

    fn formula(&self) -> String {
        dispatch!(self, f => f.formula())
    }

    fn formula_with(&self, variables: &mut Vec<String>) -> String {
        dispatch!(self, f => f.formula_with(variables))
    }

    fn operands(&self) -> Vec<FunctionRef> {
        dispatch!(self, f => f.operands())
    }

    fn build_graph_node(&self, graph: &mut Graph) -> Result<bool> {
        dispatch!(self, f => f.build_graph_node(graph))
    }

    fn real_value(&self) -> Result<f64> {
        dispatch!(self, f => f.real_value())
    }
}

impl Function {
    /// Resolve operands first, then place this function in the graph.
    ///
    /// Idempotent: built functions are left untouched. Returns whether the
    /// function is built afterwards. Each function of a shared subgraph is
    /// visited once.
    pub fn resolve(&self, graph: &mut Graph) -> Result<bool> {
        let mut visited = HashSet::new();
        self.resolve_with(graph, &mut visited)
    }

    fn resolve_with(
        &self,
        graph: &mut Graph,
        visited: &mut HashSet<*const Function>,
    ) -> Result<bool> {
        if self.is_built() {
            return Ok(true);
        }
        if !visited.insert(self as *const Function) {
            return Ok(false);
        }
        for operand in self.operands() {
            operand.resolve_with(graph, visited)?;
        }
        let built = self.build_graph_node(graph)?;
        if built {
            debug!("Resolved {}", self.function_name());
        }
        Ok(built)
    }

    /// Bind a symbolic variable to a new leaf vertex of the given shape.
    pub fn bind(&self, graph: &mut Graph, shape: &[usize]) -> Result<VertexId> {
        match self {
            Function::Variable(variable) => variable.bind(graph, shape),
            other => Err(GraphError::unsupported("bind", other.formula())),
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Function::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_reduce(&self) -> Option<&ReduceFunction> {
        match self {
            Function::Reduce(reduce) => Some(reduce),
            _ => None,
        }
    }

    pub fn is_built(&self) -> bool {
        matches!(self.construction(), Construction::Built { .. })
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formula())
    }
}

/// Materialized value of `operand`, or `None` if construction has to wait.
pub(crate) fn materialized(graph: &Graph, operand: &Function) -> Result<Option<ArrayField>> {
    match operand.value() {
        Value::Array(field) => Ok(Some(field)),
        Value::Symbolic => match graph.config().defer_policy {
            DeferPolicy::Defer => {
                debug!("Operand {} is not materialized, deferring", operand.function_name());
                Ok(None)
            }
            DeferPolicy::Reject => Err(GraphError::OperandNotMaterialized {
                id: operand.function_name().to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;

    #[test]
    fn test_display_matches_formula() {
        let mut graph = Graph::new();
        let x = Variable::materialized(&mut graph, "x", &[2, 3]);
        let m = ops::mean(&mut graph, &x, &[0]).unwrap();

        assert_eq!(m.to_string(), "mean(x,axes:[0])");
    }

    #[test]
    fn test_bind_non_variable_is_unsupported() {
        let mut graph = Graph::new();
        let c = Constant::new(&mut graph, 2.0);

        assert!(matches!(
            c.bind(&mut graph, &[1]),
            Err(GraphError::UnsupportedOperation { operation: "bind", .. })
        ));
    }

    #[test]
    fn test_materialized_rejects_under_reject_policy() {
        let config = GraphConfig::default().with_defer_policy(DeferPolicy::Reject);
        let graph = Graph::with_config(config);
        let x = Variable::symbolic("x");

        assert_eq!(
            materialized(&graph, &x),
            Err(GraphError::OperandNotMaterialized { id: "x".to_string() })
        );
    }

    #[test]
    fn test_resolve_diamond_chain_visits_each_function_once() {
        let mut graph = Graph::new();
        let x = Variable::symbolic("x");
        let mut y = Rc::clone(&x);
        for _ in 0..48 {
            y = ops::add(&mut graph, &y, &y).unwrap();
        }

        assert!(!y.resolve(&mut graph).unwrap());
        assert!(graph.is_empty());

        x.bind(&mut graph, &[2]).unwrap();
        assert!(y.resolve(&mut graph).unwrap());
        assert_eq!(graph.vertex_count(), 49);
        assert_eq!(graph.edge_count(), 96);
        assert_eq!(y.value().as_array().unwrap().id(), "add(47,47 -> 48)");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut graph = Graph::new();
        let x = Variable::materialized(&mut graph, "x", &[3]);
        let y = ops::exp(&mut graph, &x).unwrap();

        assert!(y.resolve(&mut graph).unwrap());
        assert!(y.resolve(&mut graph).unwrap());
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }
}

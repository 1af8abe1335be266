//! Axis-reducing operations (sum, mean, max, ...).

use super::{
    ArrayField, Construction, Differentiable, Function, FunctionRef, Slot, Value, materialized,
};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, Graph, NewOperation, OpType};
use crate::shape::{product, remove_axes};
use log::trace;
use std::rc::Rc;

/// Kind of reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceOp {
    Sum,
    Mean,
    Prod,
    Max,
    Min,
    Norm1,
    Norm2,
    Variance,
    StandardDeviation,
}

impl ReduceOp {
    /// Operation name used in formulas and ids.
    pub fn name(&self) -> &'static str {
        match self {
            ReduceOp::Sum => "sum",
            ReduceOp::Mean => "mean",
            ReduceOp::Prod => "prod",
            ReduceOp::Max => "max",
            ReduceOp::Min => "min",
            ReduceOp::Norm1 => "norm1",
            ReduceOp::Norm2 => "norm2",
            ReduceOp::Variance => "var",
            ReduceOp::StandardDeviation => "std",
        }
    }
}

/// A reduction of one operand over a fixed set of axes.
///
/// Removing the reduced axes gives the result shape; the remaining
/// dimensions keep their order. An empty axis list leaves the shape
/// unchanged.
#[derive(Debug)]
pub struct ReduceFunction {
    op: ReduceOp,
    operand: FunctionRef,
    dimensions: Vec<usize>,
    slot: Slot,
}

impl ReduceFunction {
    /// Start building a reduction of kind `op`.
    pub fn builder(op: ReduceOp) -> ReduceBuilder {
        ReduceBuilder {
            op,
            operand: None,
            dimensions: Vec::new(),
        }
    }

    /// Build a reduction of `operand` over `dimensions` and register it.
    ///
    /// # Arguments
    ///
    /// * `graph` - Graph receiving the result vertex and edge
    /// * `op` - Kind of reduction
    /// * `operand` - Function to reduce
    /// * `dimensions` - Axes to remove from the operand shape
    ///
    /// # Errors
    ///
    /// Returns `AxisOutOfBounds` or `DuplicateAxis` for invalid axes, and
    /// `OperandNotMaterialized` for a symbolic operand under
    /// `DeferPolicy::Reject`. The graph is unchanged on error.
    ///
    /// # Example
    ///
    /// ```
    /// use ndgraph::function::{Differentiable, ReduceFunction, ReduceOp, Variable};
    /// use ndgraph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// let x = Variable::materialized(&mut graph, "x", &[4, 3, 2]);
    /// let s = ReduceFunction::new(&mut graph, ReduceOp::Sum, &x, &[1]).unwrap();
    ///
    /// let edge = s.op_state().unwrap();
    /// assert_eq!(graph.op_state(edge).unwrap().n(), 8);
    /// ```
    pub fn new(
        graph: &mut Graph,
        op: ReduceOp,
        operand: &FunctionRef,
        dimensions: &[usize],
    ) -> Result<FunctionRef> {
        Self::builder(op)
            .operand(operand)
            .dimensions(dimensions)
            .build(graph)
    }

    pub fn op(&self) -> ReduceOp {
        self.op
    }

    /// The single operand.
    pub fn arg(&self) -> &FunctionRef {
        &self.operand
    }

    /// Axes reduced over.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    fn add_edges(&self, graph: &mut Graph, input: &ArrayField) -> Result<()> {
        let shape = remove_axes(input.shape(), &self.dimensions)?;
        let n = product(&shape);
        trace!(
            "{}: {:?} minus axes {:?} -> {:?} ({n} elements)",
            self.op.name(),
            input.shape(),
            self.dimensions,
            shape
        );

        let added = graph.add_operation(NewOperation {
            op_type: OpType::Accumulation,
            op_name: self.op.name(),
            input_id: input.id(),
            inputs: &[input.vertex_id()],
            axes: &self.dimensions,
            shape: shape.clone(),
            n,
        })?;
        self.slot.fill(
            ArrayField::new(added.vertex, added.result_id, shape),
            Some(added.edge),
        );
        Ok(())
    }
}

impl Differentiable for ReduceFunction {
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
            "{}({},axes:{:?})",
            self.op.name(),
            self.operand.formula(),
            self.dimensions
        )
    }

    fn formula_with(&self, variables: &mut Vec<String>) -> String {
        format!(
            "{}({},axes:{:?})",
            self.op.name(),
            self.operand.formula_with(variables),
            self.dimensions
        )
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
        self.add_edges(graph, &input)?;
        Ok(true)
    }
}

/// Builder for [`ReduceFunction`].
///
/// Building without an operand fails with `GraphError::InvalidArgument`
/// before the graph is touched.
#[derive(Debug, Clone)]
pub struct ReduceBuilder {
    op: ReduceOp,
    operand: Option<FunctionRef>,
    dimensions: Vec<usize>,
}

impl ReduceBuilder {
    pub fn operand(mut self, operand: &FunctionRef) -> Self {
        self.operand = Some(Rc::clone(operand));
        self
    }

    pub fn dimensions(mut self, dimensions: &[usize]) -> Self {
        self.dimensions = dimensions.to_vec();
        self
    }

    /// Create the function and register it in `graph`.
    pub fn build(self, graph: &mut Graph) -> Result<FunctionRef> {
        let operand = self.operand.ok_or_else(|| {
            GraphError::invalid_argument(format!("{} requires an operand", self.op.name()))
        })?;

        let function = Rc::new(Function::Reduce(ReduceFunction {
            op: self.op,
            operand,
            dimensions: self.dimensions,
            slot: Slot::default(),
        }));
        function.build_graph_node(graph)?;
        Ok(function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Variable;
    use crate::graph::VertexId;

    fn setup(shape: &[usize]) -> (Graph, FunctionRef) {
        let mut graph = Graph::new();
        let x = Variable::materialized(&mut graph, "x", shape);
        (graph, x)
    }

    #[test]
    fn test_reduce_middle_axis() {
        let (mut graph, x) = setup(&[4, 3, 2]);

        let s = ReduceFunction::new(&mut graph, ReduceOp::Sum, &x, &[1]).unwrap();

        let field = s.value().as_array().cloned().unwrap();
        assert_eq!(field.shape(), &[4, 2]);
        assert_eq!(field.vertex_id(), VertexId::new(1));
        assert_eq!(field.id(), "sum(x -> x)");

        let state = graph.op_state(s.op_state().unwrap()).unwrap();
        assert_eq!(state.op_type(), OpType::Accumulation);
        assert_eq!(state.op_name(), "sum");
        assert_eq!(state.axes(), &[1]);
        assert_eq!(state.n(), 8);
        assert_eq!(state.vertex_ids(), &["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn test_reduce_no_axes_keeps_shape() {
        let (mut graph, x) = setup(&[4, 3, 2]);

        let m = ReduceFunction::new(&mut graph, ReduceOp::Mean, &x, &[]).unwrap();

        assert_eq!(m.value().as_array().unwrap().shape(), &[4, 3, 2]);
        let state = graph.op_state(m.op_state().unwrap()).unwrap();
        assert_eq!(state.n(), 24);
        assert!(state.axes().is_empty());
    }

    #[test]
    fn test_reduce_all_axes_is_scalar() {
        let (mut graph, x) = setup(&[4, 3]);

        let m = ReduceFunction::new(&mut graph, ReduceOp::Max, &x, &[0, 1]).unwrap();

        assert!(m.value().as_array().unwrap().shape().is_empty());
        assert_eq!(graph.op_state(m.op_state().unwrap()).unwrap().n(), 1);
    }

    #[test]
    fn test_builder_without_operand() {
        let mut graph = Graph::new();

        let result = ReduceFunction::builder(ReduceOp::Sum)
            .dimensions(&[0])
            .build(&mut graph);

        assert!(matches!(result, Err(GraphError::InvalidArgument { .. })));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_invalid_axis_leaves_graph_unchanged() {
        let (mut graph, x) = setup(&[4, 3]);

        let result = ReduceFunction::new(&mut graph, ReduceOp::Sum, &x, &[2]);

        assert_eq!(
            result.unwrap_err(),
            GraphError::AxisOutOfBounds { axis: 2, rank: 2 }
        );
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_formula() {
        let (mut graph, x) = setup(&[4, 3, 2]);
        let s = ReduceFunction::new(&mut graph, ReduceOp::Sum, &x, &[0, 2]).unwrap();

        assert_eq!(s.formula(), "sum(x,axes:[0, 2])");
        let mut variables = Vec::new();
        assert_eq!(s.formula_with(&mut variables), "sum(x,axes:[0, 2])");
        assert_eq!(variables, vec!["x".to_string()]);
    }

    #[test]
    fn test_arg_is_same_operand() {
        let (mut graph, x) = setup(&[2, 2]);
        let s = ReduceFunction::new(&mut graph, ReduceOp::Norm2, &x, &[0]).unwrap();

        let reduce = s.as_reduce().unwrap();
        assert!(Rc::ptr_eq(reduce.arg(), &x));
        assert_eq!(reduce.dimensions(), &[0]);
        let operands = s.operands();
        assert_eq!(operands.len(), 1);
        assert!(Rc::ptr_eq(&operands[0], &x));
    }

    #[test]
    fn test_real_value_is_unsupported() {
        let (mut graph, x) = setup(&[2]);
        let s = ReduceFunction::new(&mut graph, ReduceOp::Sum, &x, &[0]).unwrap();

        assert_eq!(
            s.real_value(),
            Err(GraphError::UnsupportedOperation {
                operation: "real_value",
                function: "sum(x,axes:[0])".to_string(),
            })
        );
    }

    #[test]
    fn test_op_names() {
        assert_eq!(ReduceOp::Variance.name(), "var");
        assert_eq!(ReduceOp::StandardDeviation.name(), "std");
        assert_eq!(ReduceOp::Norm1.name(), "norm1");
    }
}

//! Graph construction options.

use crate::graph::OpType;

/// How result descriptor and operation ids of reductions are spelled.
///
/// The legacy spelling names the operand on both sides of the arrow for the
/// result descriptor (`sum(x -> x)`), because the new vertex has no id yet
/// when the descriptor is created. The operation id then points at that
/// descriptor id (`sum(x -> sum(x -> x))`). Graph dumps produced by older
/// tooling use this spelling.
///
/// Only `OpType::Accumulation` honors the legacy spelling. Every other
/// operation type always uses the consistent one, so ids of elementwise
/// chains grow linearly with depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultIdStyle {
    /// `op(in -> in)` for descriptors, `op(in -> descriptor)` for states.
    #[default]
    Legacy,
    /// `op(in -> <vertex id>)` for both descriptor and state.
    Consistent,
}

/// What to do when an operand has no concrete shape yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeferPolicy {
    /// Leave the function deferred until [`crate::Function::resolve`].
    #[default]
    Defer,
    /// Fail construction with `GraphError::OperandNotMaterialized`.
    Reject,
}

/// Options stored on a [`crate::Graph`] and consulted by every construction.
///
/// # Example
///
/// ```
/// use ndgraph::{DeferPolicy, Graph, GraphConfig, ResultIdStyle};
///
/// let config = GraphConfig::default()
///     .with_id_style(ResultIdStyle::Consistent)
///     .with_defer_policy(DeferPolicy::Reject);
/// let graph = Graph::with_config(config);
/// assert_eq!(graph.config().id_style, ResultIdStyle::Consistent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphConfig {
    pub id_style: ResultIdStyle,
    pub defer_policy: DeferPolicy,
}

impl GraphConfig {
    pub fn with_id_style(mut self, id_style: ResultIdStyle) -> Self {
        self.id_style = id_style;
        self
    }

    pub fn with_defer_policy(mut self, defer_policy: DeferPolicy) -> Self {
        self.defer_policy = defer_policy;
        self
    }

    /// Spelling used for operations of `op_type`.
    pub fn id_style_for(&self, op_type: OpType) -> ResultIdStyle {
        match op_type {
            OpType::Accumulation => self.id_style,
            _ => ResultIdStyle::Consistent,
        }
    }

    /// Id of a result descriptor for `op` applied to `input_id`.
    pub(crate) fn result_id(
        &self,
        op_type: OpType,
        op_name: &str,
        input_id: &str,
        vertex: usize,
    ) -> String {
        match self.id_style_for(op_type) {
            ResultIdStyle::Legacy => format!("{op_name}({input_id} -> {input_id})"),
            ResultIdStyle::Consistent => format!("{op_name}({input_id} -> {vertex})"),
        }
    }

    /// Id of the operation state whose result is `result_id`.
    pub(crate) fn op_id(
        &self,
        op_type: OpType,
        op_name: &str,
        input_id: &str,
        result_id: &str,
        vertex: usize,
    ) -> String {
        match self.id_style_for(op_type) {
            ResultIdStyle::Legacy => format!("{op_name}({input_id} -> {result_id})"),
            ResultIdStyle::Consistent => format!("{op_name}({input_id} -> {vertex})"),
        }
    }
}

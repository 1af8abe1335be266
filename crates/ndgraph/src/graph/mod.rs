//! Computation graph of tensor descriptors and operation states.
//!
//! Vertices are [`NdArrayVertex`] values; edges carry an [`OpState`] from an
//! operand vertex to the result vertex. Storage is a `petgraph` directed
//! graph that is only ever appended to, so vertex and edge indices are
//! stable and a new vertex always receives the current vertex count as id.
//!
//! ```text
//!   x (leaf) ──sum, axes [1]──►  sum(x -> x)
//!   [4, 3, 2]                    [4, 2]
//! ```
//!
//! The graph is an explicit handle: every construction takes `&mut Graph`,
//! which serializes vertex-id assignment.

mod info;
mod op_state;
mod vertex;

pub use info::NdArrayInformation;
pub use op_state::{Edge, OpState, OpType};
pub use vertex::NdArrayVertex;

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::shape::Shape;
use log::debug;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::fmt;

/// Identity of a vertex in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(usize);

impl VertexId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the internal index.
    pub fn index(&self) -> usize {
        self.0
    }

    fn node(&self) -> NodeIndex {
        NodeIndex::new(self.0)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an edge in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the internal index.
    pub fn index(&self) -> usize {
        self.0
    }

    fn edge(&self) -> EdgeIndex {
        EdgeIndex::new(self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request to record one operation application.
#[derive(Debug, Clone)]
pub struct NewOperation<'a> {
    pub op_type: OpType,
    pub op_name: &'a str,
    /// Descriptor id of the operand(s), used to derive the result ids.
    pub input_id: &'a str,
    /// Operand vertices, in operand order. Must not be empty.
    pub inputs: &'a [VertexId],
    pub axes: &'a [usize],
    /// Inferred result shape.
    pub shape: Shape,
    /// Element count of the result.
    pub n: usize,
}

/// Vertex and edge created by [`Graph::add_operation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedOperation {
    pub vertex: VertexId,
    /// Edge from the first operand; the result descriptor's owner.
    pub edge: EdgeId,
    /// Id of the result descriptor.
    pub result_id: String,
}

/// Symbolic computation graph.
#[derive(Clone, Default)]
pub struct Graph {
    inner: DiGraph<NdArrayVertex, Edge>,
    config: GraphConfig,
}

impl Graph {
    /// Create a new empty graph with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty graph with the given options.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            inner: DiGraph::new(),
            config,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Check if graph is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Insert a vertex with id equal to the current vertex count.
    ///
    /// The new vertex has no producing operation, which makes it a leaf
    /// until [`Graph::add_operation`] links one.
    pub fn add_vertex(&mut self, info: NdArrayInformation) -> VertexId {
        let id = VertexId(self.vertex_count());
        debug!("Adding vertex {id} ({}) with shape {:?}", info.id(), info.shape());
        let index = self.inner.add_node(NdArrayVertex::new(id, info));
        debug_assert_eq!(index.index(), id.index());
        id
    }

    /// Insert a directed edge carrying `op_state` between existing vertices.
    ///
    /// This is the raw primitive: it does not link the state to the target
    /// vertex. Use [`Graph::add_operation`] to record a complete operation.
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        op_state: OpState,
        forward: bool,
    ) -> Result<EdgeId> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Ok(self.insert_edge(from, to, Edge::new(op_state, forward)))
    }

    /// Record one operation: result vertex, operand edges and the links
    /// between them, in a single step.
    ///
    /// The result vertex gets the current vertex count as id. One forward
    /// edge is added from every operand to the result, each carrying the
    /// same [`OpState`]. The edge from the first operand becomes both the
    /// vertex's `op_state` and the descriptor's `owner`, and the state's
    /// `result` points at the new vertex.
    ///
    /// Operands are checked before anything is inserted, so on error the
    /// graph is unchanged.
    pub fn add_operation(&mut self, op: NewOperation<'_>) -> Result<AddedOperation> {
        let (&first, rest) = op
            .inputs
            .split_first()
            .ok_or_else(|| GraphError::invalid_argument("operation has no operands"))?;
        for &input in op.inputs {
            self.check_vertex(input)?;
        }

        let vertex = VertexId(self.vertex_count());
        let result_id =
            self.config
                .result_id(op.op_type, op.op_name, op.input_id, vertex.index());
        let op_id = self.config.op_id(
            op.op_type,
            op.op_name,
            op.input_id,
            &result_id,
            vertex.index(),
        );

        let mut vertex_ids: Vec<String> = op.inputs.iter().map(VertexId::to_string).collect();
        vertex_ids.push(vertex.to_string());
        let mut state = OpState::new(
            op.op_type,
            op.op_name,
            op_id,
            op.axes.to_vec(),
            vertex_ids,
            op.n,
        );
        state.set_result(vertex);

        self.add_vertex(NdArrayInformation::new(result_id.clone(), op.shape));
        let edge = self.insert_edge(first, vertex, Edge::new(state.clone(), true));
        for &input in rest {
            self.insert_edge(input, vertex, Edge::new(state.clone(), true));
        }
        self.inner[vertex.node()].attach(edge);

        debug!(
            "Recorded {} {} on {:?} -> vertex {vertex} (edge {edge})",
            op.op_type, op.op_name, op.inputs
        );
        Ok(AddedOperation {
            vertex,
            edge,
            result_id,
        })
    }

    /// Get vertex by ID.
    pub fn vertex(&self, id: VertexId) -> Option<&NdArrayVertex> {
        self.inner.node_weight(id.node())
    }

    /// Get edge payload by ID.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.inner.edge_weight(id.edge())
    }

    /// Get the operation state carried by an edge.
    pub fn op_state(&self, id: EdgeId) -> Option<&OpState> {
        self.edge(id).map(Edge::op_state)
    }

    /// Operation state that produced a vertex, `None` for leaves.
    pub fn producer(&self, id: VertexId) -> Option<&OpState> {
        self.vertex(id)
            .and_then(NdArrayVertex::op_state)
            .and_then(|edge| self.op_state(edge))
    }

    /// Source and target vertices of an edge.
    pub fn edge_endpoints(&self, id: EdgeId) -> Result<(VertexId, VertexId)> {
        self.inner
            .edge_endpoints(id.edge())
            .map(|(from, to)| (VertexId(from.index()), VertexId(to.index())))
            .ok_or(GraphError::EdgeNotFound { id: id.index() })
    }

    /// Edges pointing into a vertex, in insertion order.
    pub fn incoming(&self, id: VertexId) -> Result<Vec<EdgeId>> {
        self.check_vertex(id)?;
        let mut edges: Vec<EdgeId> = self
            .inner
            .edges_directed(id.node(), Direction::Incoming)
            .map(|e| EdgeId(e.id().index()))
            .collect();
        edges.sort();
        Ok(edges)
    }

    /// Iterate over all vertices in id order.
    pub fn vertices(&self) -> impl Iterator<Item = &NdArrayVertex> {
        self.inner.node_indices().map(move |index| &self.inner[index])
    }

    /// Vertices not produced by any operation.
    pub fn leaves(&self) -> Vec<VertexId> {
        self.vertices()
            .filter(|v| v.is_leaf())
            .map(NdArrayVertex::vertex_id)
            .collect()
    }

    /// Vertices ordered so that every operand precedes its results.
    pub fn topological_order(&self) -> Result<Vec<VertexId>> {
        toposort(&self.inner, None)
            .map(|order| order.into_iter().map(|n| VertexId(n.index())).collect())
            .map_err(|cycle| GraphError::Cycle {
                vertex: cycle.node_id().index(),
            })
    }

    fn check_vertex(&self, id: VertexId) -> Result<()> {
        if id.index() < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound { id: id.index() })
        }
    }

    fn insert_edge(&mut self, from: VertexId, to: VertexId, edge: Edge) -> EdgeId {
        EdgeId(self.inner.add_edge(from.node(), to.node(), edge).index())
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("num_vertices", &self.inner.node_count())
            .field("num_edges", &self.inner.edge_count())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResultIdStyle;
    use crate::shape::shape_of;

    fn leaf(graph: &mut Graph, id: &str, shape: &[usize]) -> VertexId {
        graph.add_vertex(NdArrayInformation::new(id, shape_of(shape)))
    }

    fn reduce_op<'a>(inputs: &'a [VertexId], axes: &'a [usize], shape: &[usize]) -> NewOperation<'a> {
        NewOperation {
            op_type: OpType::Accumulation,
            op_name: "sum",
            input_id: "x",
            inputs,
            axes,
            shape: shape_of(shape),
            n: shape.iter().product(),
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_vertex_ids_are_sequential() {
        let mut graph = Graph::new();
        let a = leaf(&mut graph, "a", &[2]);
        let b = leaf(&mut graph, "b", &[3]);

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(graph.vertex_count(), 2);
        assert!(graph.vertex(a).unwrap().is_leaf());
    }

    #[test]
    fn test_add_edge_unknown_vertex() {
        let mut graph = Graph::new();
        let a = leaf(&mut graph, "a", &[2]);
        let state = OpState::new(OpType::Transform, "neg", "neg", vec![], vec![], 2);

        let err = graph.add_edge(a, VertexId::new(7), state, true).unwrap_err();
        assert_eq!(err, GraphError::VertexNotFound { id: 7 });
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_operation_links_both_ways() {
        let mut graph = Graph::new();
        let x = leaf(&mut graph, "x", &[4, 3, 2]);

        let added = graph.add_operation(reduce_op(&[x], &[1], &[4, 2])).unwrap();

        assert_eq!(added.vertex.index(), 1);
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let vertex = graph.vertex(added.vertex).unwrap();
        assert_eq!(vertex.op_state(), Some(added.edge));
        assert_eq!(vertex.value().owner(), Some(added.edge));
        assert_eq!(vertex.value().id(), "sum(x -> x)");

        let state = graph.op_state(added.edge).unwrap();
        assert_eq!(state.result(), Some(added.vertex));
        assert_eq!(state.id(), "sum(x -> sum(x -> x))");
        assert_eq!(state.vertex_ids(), &["0".to_string(), "1".to_string()]);
        assert!(graph.edge(added.edge).unwrap().is_forward());
        assert_eq!(graph.edge_endpoints(added.edge), Ok((x, added.vertex)));
        assert_eq!(
            graph.edge_endpoints(EdgeId::new(9)),
            Err(GraphError::EdgeNotFound { id: 9 })
        );
    }

    #[test]
    fn test_add_operation_consistent_ids() {
        let config = GraphConfig::default().with_id_style(ResultIdStyle::Consistent);
        let mut graph = Graph::with_config(config);
        let x = leaf(&mut graph, "x", &[4, 3]);

        let added = graph.add_operation(reduce_op(&[x], &[0], &[3])).unwrap();

        assert_eq!(graph.vertex(added.vertex).unwrap().value().id(), "sum(x -> 1)");
        assert_eq!(graph.op_state(added.edge).unwrap().id(), "sum(x -> 1)");
    }

    #[test]
    fn test_add_operation_without_inputs_leaves_graph_unchanged() {
        let mut graph = Graph::new();
        leaf(&mut graph, "x", &[2]);

        let result = graph.add_operation(reduce_op(&[], &[], &[2]));
        assert!(matches!(result, Err(GraphError::InvalidArgument { .. })));
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_add_operation_unknown_input_leaves_graph_unchanged() {
        let mut graph = Graph::new();
        leaf(&mut graph, "x", &[2]);

        let inputs = [VertexId::new(0), VertexId::new(5)];
        let result = graph.add_operation(reduce_op(&inputs, &[], &[2]));
        assert_eq!(result, Err(GraphError::VertexNotFound { id: 5 }));
        assert_eq!(graph.vertex_count(), 1);
    }

    #[test]
    fn test_incoming_and_leaves() {
        let mut graph = Graph::new();
        let a = leaf(&mut graph, "a", &[2]);
        let b = leaf(&mut graph, "b", &[2]);
        let op = NewOperation {
            op_type: OpType::Pairwise,
            op_name: "add",
            input_id: "a,b",
            inputs: &[a, b],
            axes: &[],
            shape: shape_of(&[2]),
            n: 2,
        };
        let added = graph.add_operation(op).unwrap();

        let incoming = graph.incoming(added.vertex).unwrap();
        assert_eq!(incoming.len(), 2);
        assert_eq!(incoming[0], added.edge);
        assert_eq!(graph.leaves(), vec![a, b]);
    }

    #[test]
    fn test_topological_order() {
        let mut graph = Graph::new();
        let x = leaf(&mut graph, "x", &[3, 2]);
        let first = graph.add_operation(reduce_op(&[x], &[0], &[2])).unwrap();
        let second = graph
            .add_operation(reduce_op(&[first.vertex], &[0], &[]))
            .unwrap();

        let order = graph.topological_order().unwrap();
        assert_eq!(order, vec![x, first.vertex, second.vertex]);
    }

    #[test]
    fn test_topological_order_detects_cycle() {
        let mut graph = Graph::new();
        let a = leaf(&mut graph, "a", &[1]);
        let b = leaf(&mut graph, "b", &[1]);
        let state = OpState::new(OpType::Transform, "neg", "neg", vec![], vec![], 1);
        graph.add_edge(a, b, state.clone(), true).unwrap();
        graph.add_edge(b, a, state, true).unwrap();

        assert!(matches!(
            graph.topological_order(),
            Err(GraphError::Cycle { .. })
        ));
    }
}

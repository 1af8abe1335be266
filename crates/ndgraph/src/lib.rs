//! ndgraph - symbolic tensor computation graph with shape inference.
//!
//! This crate builds the intermediate representation that automatic
//! differentiation and deferred execution work from: a directed graph of
//! tensor descriptors connected by operation records. Nothing here computes
//! numbers; every operation only validates its operands, infers the result
//! shape and records itself in the graph.
//!
//! # Architecture
//!
//! ```text
//! Level 1: Differentiable functions (function module)
//!     → Variable, Constant, ReduceFunction, TransformFunction, PairwiseFunction
//!
//! Level 2: Shape inference (shape module)
//!     → remove_axes, product, validate_axes
//!
//! Level 3: Graph storage (graph module)
//!     → NdArrayVertex (NdArrayInformation) ──Edge(OpState)──► NdArrayVertex
//! ```
//!
//! # Example
//!
//! ```
//! use ndgraph::{Graph, OpType};
//! use ndgraph::function::{Differentiable, Variable, ops};
//!
//! let mut graph = Graph::new();
//! let x = Variable::materialized(&mut graph, "x", &[4, 3, 2]);
//!
//! // Reduce over axis 1: [4, 3, 2] -> [4, 2]
//! let s = ops::sum(&mut graph, &x, &[1]).unwrap();
//! assert_eq!(s.formula(), "sum(x,axes:[1])");
//!
//! let state = graph.op_state(s.op_state().unwrap()).unwrap();
//! assert_eq!(state.op_type(), OpType::Accumulation);
//! assert_eq!(state.n(), 8);
//!
//! // The result vertex and its producing operation point at each other.
//! let result = graph.vertex(state.result().unwrap()).unwrap();
//! assert_eq!(result.value().owner(), s.op_state());
//! assert_eq!(result.value().shape(), &[4, 2]);
//! ```

pub mod config;
pub mod error;
pub mod function;
pub mod graph;
pub mod shape;

pub use config::{DeferPolicy, GraphConfig, ResultIdStyle};
pub use error::{GraphError, Result};
pub use function::{Differentiable, Function, FunctionRef};
pub use graph::{EdgeId, Graph, NdArrayInformation, NdArrayVertex, OpState, OpType, VertexId};
pub use shape::Shape;

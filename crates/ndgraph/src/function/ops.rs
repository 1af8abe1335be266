//! Free-function constructors for every operation.
//!
//! ```
//! use ndgraph::function::{Differentiable, Variable, ops};
//! use ndgraph::Graph;
//!
//! let mut graph = Graph::new();
//! let x = Variable::materialized(&mut graph, "x", &[8, 4]);
//! let w = Variable::materialized(&mut graph, "w", &[8, 4]);
//!
//! let y = ops::mul(&mut graph, &x, &w).unwrap();
//! let e = ops::exp(&mut graph, &y).unwrap();
//! let z = ops::mean(&mut graph, &e, &[0]).unwrap();
//! assert_eq!(z.formula(), "mean(exp((x * w)),axes:[0])");
//! ```

use super::{
    FunctionRef, PairwiseFunction, PairwiseOp, ReduceFunction, ReduceOp, TransformFunction,
    TransformOp,
};
use crate::error::Result;
use crate::graph::Graph;

macro_rules! reduce_fns {
    ($($(#[$doc:meta])* $name:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(graph: &mut Graph, x: &FunctionRef, axes: &[usize]) -> Result<FunctionRef> {
                ReduceFunction::new(graph, ReduceOp::$op, x, axes)
            }
        )*
    };
}

macro_rules! transform_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(graph: &mut Graph, x: &FunctionRef) -> Result<FunctionRef> {
                TransformFunction::new(graph, TransformOp::$op, x)
            }
        )*
    };
}

macro_rules! pairwise_fns {
    ($($name:ident => $op:ident),* $(,)?) => {
        $(
            pub fn $name(graph: &mut Graph, lhs: &FunctionRef, rhs: &FunctionRef) -> Result<FunctionRef> {
                PairwiseFunction::new(graph, PairwiseOp::$op, lhs, rhs)
            }
        )*
    };
}

reduce_fns! {
    /// Sum over `axes`.
    sum => Sum,
    /// Mean over `axes`.
    mean => Mean,
    prod => Prod,
    max => Max,
    min => Min,
    norm1 => Norm1,
    norm2 => Norm2,
    /// Variance over `axes`.
    variance => Variance,
    /// Standard deviation over `axes`.
    std_dev => StandardDeviation,
}

transform_fns! {
    neg => Neg,
    abs => Abs,
    exp => Exp,
    log => Log,
    sqrt => Sqrt,
    tanh => Tanh,
    sigmoid => Sigmoid,
    relu => Relu,
}

pairwise_fns! {
    add => Add,
    sub => Sub,
    mul => Mul,
    div => Div,
}

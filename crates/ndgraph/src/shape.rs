//! Shape utilities for shape inference.
//!
//! Shapes are small, so they are stored inline in a `SmallVec`.

use crate::error::{GraphError, Result};
use smallvec::SmallVec;

/// Ordered tensor dimensions.
pub type Shape = SmallVec<[usize; 8]>;

/// Build a [`Shape`] from a slice.
pub fn shape_of(dims: &[usize]) -> Shape {
    dims.iter().copied().collect()
}

/// Number of elements described by `shape`.
///
/// The empty shape describes a scalar and has one element.
///
/// # Examples
///
/// ```
/// use ndgraph::shape::product;
///
/// assert_eq!(product(&[4, 3, 2]), 24);
/// assert_eq!(product(&[]), 1);
/// assert_eq!(product(&[3, 0]), 0);
/// ```
pub fn product(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Check that `axes` are distinct and valid indices into a shape of `rank`.
pub fn validate_axes(axes: &[usize], rank: usize) -> Result<()> {
    for (i, &axis) in axes.iter().enumerate() {
        if axis >= rank {
            return Err(GraphError::AxisOutOfBounds { axis, rank });
        }
        if axes[..i].contains(&axis) {
            return Err(GraphError::DuplicateAxis { axis });
        }
    }
    Ok(())
}

/// Remove the dimensions listed in `axes`, keeping the order of the rest.
///
/// # Examples
///
/// ```
/// use ndgraph::shape::remove_axes;
///
/// assert_eq!(remove_axes(&[4, 3, 2], &[1]).unwrap().as_slice(), &[4, 2]);
/// assert_eq!(remove_axes(&[4, 3, 2], &[]).unwrap().as_slice(), &[4, 3, 2]);
/// assert_eq!(remove_axes(&[4, 3, 2], &[2, 0]).unwrap().as_slice(), &[3]);
/// assert!(remove_axes(&[4, 3], &[2]).is_err());
/// ```
pub fn remove_axes(shape: &[usize], axes: &[usize]) -> Result<Shape> {
    validate_axes(axes, shape.len())?;
    Ok(shape
        .iter()
        .enumerate()
        .filter(|(i, _)| !axes.contains(i))
        .map(|(_, &dim)| dim)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_middle_axis() {
        assert_eq!(remove_axes(&[4, 3, 2], &[1]).unwrap().as_slice(), &[4, 2]);
    }

    #[test]
    fn test_remove_no_axes() {
        assert_eq!(remove_axes(&[5, 7], &[]).unwrap().as_slice(), &[5, 7]);
    }

    #[test]
    fn test_remove_all_axes() {
        let shape = remove_axes(&[2, 3], &[0, 1]).unwrap();
        assert!(shape.is_empty());
        assert_eq!(product(&shape), 1);
    }

    #[test]
    fn test_remove_unordered_axes() {
        // Order of axes does not matter, order of remaining dims does.
        let shape = remove_axes(&[2, 3, 4, 5], &[3, 1]).unwrap();
        assert_eq!(shape.as_slice(), &[2, 4]);
    }

    #[test]
    fn test_axis_out_of_bounds() {
        assert_eq!(
            remove_axes(&[2, 3], &[2]),
            Err(GraphError::AxisOutOfBounds { axis: 2, rank: 2 })
        );
    }

    #[test]
    fn test_duplicate_axis() {
        assert_eq!(
            validate_axes(&[0, 1, 0], 3),
            Err(GraphError::DuplicateAxis { axis: 0 })
        );
    }

    #[test]
    fn test_product_with_zero_dim() {
        assert_eq!(product(&[4, 0, 2]), 0);
    }
}

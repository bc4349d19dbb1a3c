// =============================================================================
// ndarray ↔ nalgebra Conversion Utilities
// =============================================================================
//
// Public results are stored as ndarray arrays; decompositions run on
// nalgebra matrices. All crossings between the two go through here.
//
// =============================================================================

use ndarray::{Array1, Array2};
use nalgebra::{DMatrix, DVector};

// =============================================================================
// ndarray → nalgebra
// =============================================================================

/// Convert an ndarray Array2 to a nalgebra DMatrix.
#[inline]
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    let (nrows, ncols) = a.dim();
    DMatrix::from_fn(nrows, ncols, |i, j| a[[i, j]])
}

/// Convert an ndarray Array1 to a nalgebra DVector.
#[inline]
pub fn to_dvector(v: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

// =============================================================================
// nalgebra → ndarray
// =============================================================================

/// Convert a nalgebra DMatrix to an ndarray Array2.
#[inline]
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    let (nrows, ncols) = m.shape();
    Array2::from_shape_fn((nrows, ncols), |(i, j)| m[(i, j)])
}

/// Convert a nalgebra DVector to an ndarray Array1.
#[inline]
pub fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_vec(v.as_slice().to_vec())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_matrix_layout_preserved() {
        let a = Array2::from_shape_vec((2, 3), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let m = to_dmatrix(&a);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(to_array2(&m), a);
    }

    #[test]
    fn test_non_contiguous_input() {
        let a = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let t = a.t().to_owned();
        let m = to_dmatrix(&a.t().to_owned());
        assert_eq!(to_array2(&m), t);
        let view_t = to_dmatrix(&a.reversed_axes());
        assert_eq!(view_t[(0, 1)], 3.0);
    }

    #[test]
    fn test_vector_layout_preserved() {
        let v = array![1.0, 2.0, 3.0];
        let dv = to_dvector(&v);
        assert_eq!(dv[2], 3.0);
        assert_eq!(to_array1(&dv), v);
    }
}

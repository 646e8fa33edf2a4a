//! Anti-diagonal (zig-zag) traversal of a 2D matrix.
//!
//! Walks the anti-diagonals `d = 0..rows+cols-2`, alternating direction
//! per diagonal: even diagonals run bottom-left to top-right, odd
//! diagonals top-right to bottom-left. The traversal is a bijection
//! between the matrix and a flat sequence, and the inverse reverses it
//! exactly.

use ndarray::Array2;

use crate::error::WatermarkError;

/// Flattens `mat` in zig-zag order.
///
/// Returns the flat sequence together with an `order` matrix that holds,
/// at each cell, that cell's index in the sequence.
pub fn zigzag(mat: &Array2<f64>) -> (Vec<f64>, Array2<usize>) {
    let (rows, cols) = mat.dim();
    if rows == 0 || cols == 0 {
        return (Vec::new(), Array2::zeros((rows, cols)));
    }
    let total_diagonals = rows + cols - 1;

    let mut values = Vec::with_capacity(rows * cols);
    let mut order = Array2::<usize>::zeros((rows, cols));
    let mut counter = 0usize;

    for diagonal in 0..total_diagonals {
        if diagonal % 2 == 0 {
            // Upwards: bottom-left to top-right.
            let mut r = diagonal.min(rows - 1) as isize;
            let mut c = diagonal.saturating_sub(rows - 1) as isize;
            while r >= 0 && (c as usize) < cols {
                values.push(mat[[r as usize, c as usize]]);
                order[[r as usize, c as usize]] = counter;
                counter += 1;
                r -= 1;
                c += 1;
            }
        } else {
            // Downwards: top-right to bottom-left.
            let mut r = diagonal.saturating_sub(cols - 1) as isize;
            let mut c = diagonal.min(cols - 1) as isize;
            while (r as usize) < rows && c >= 0 {
                values.push(mat[[r as usize, c as usize]]);
                order[[r as usize, c as usize]] = counter;
                counter += 1;
                r += 1;
                c -= 1;
            }
        }
    }

    (values, order)
}

/// Rebuilds a `rows x cols` matrix from a zig-zag flattened sequence.
///
/// Fails if the sequence length does not match the target shape.
pub fn inverse_zigzag(
    values: &[f64],
    rows: usize,
    cols: usize,
) -> Result<Array2<f64>, WatermarkError> {
    if values.len() != rows * cols {
        return Err(WatermarkError::ShapeMismatch {
            expected: rows * cols,
            actual: values.len(),
        });
    }

    let mut mat = Array2::<f64>::zeros((rows, cols));
    if rows == 0 || cols == 0 {
        return Ok(mat);
    }
    let total_diagonals = rows + cols - 1;
    let mut index = 0usize;

    for diagonal in 0..total_diagonals {
        if diagonal % 2 == 0 {
            let mut r = diagonal.min(rows - 1) as isize;
            let mut c = diagonal.saturating_sub(rows - 1) as isize;
            while r >= 0 && (c as usize) < cols {
                mat[[r as usize, c as usize]] = values[index];
                index += 1;
                r -= 1;
                c += 1;
            }
        } else {
            let mut r = diagonal.saturating_sub(cols - 1) as isize;
            let mut c = diagonal.min(cols - 1) as isize;
            while (r as usize) < rows && c >= 0 {
                mat[[r as usize, c as usize]] = values[index];
                index += 1;
                r += 1;
                c -= 1;
            }
        }
    }

    Ok(mat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn traversal_order_on_3x3() {
        let mat = arr2(&[
            [1.0, 2.0, 3.0],
            [4.0, 5.0, 6.0],
            [7.0, 8.0, 9.0],
        ]);

        let (values, order) = zigzag(&mat);

        // d0 up: (0,0); d1 down: (0,1),(1,0); d2 up: (2,0),(1,1),(0,2);
        // d3 down: (1,2),(2,1); d4 up: (2,2).
        assert_eq!(values, vec![1.0, 2.0, 4.0, 7.0, 5.0, 3.0, 6.0, 8.0, 9.0]);
        assert_eq!(
            order,
            arr2(&[[0usize, 1, 5], [2, 4, 6], [3, 7, 8]])
        );
    }

    #[test]
    fn roundtrip_is_exact_on_rectangular_shapes() {
        for &(rows, cols) in &[(1usize, 1usize), (1, 7), (5, 1), (4, 5), (6, 3)] {
            let mat = Array2::from_shape_fn((rows, cols), |(i, j)| (i * cols + j) as f64 * 1.5);
            let (values, _) = zigzag(&mat);
            let back = inverse_zigzag(&values, rows, cols).expect("length matches");
            assert_eq!(back, mat, "roundtrip failed for {rows}x{cols}");
        }
    }

    #[test]
    fn inverse_rejects_wrong_length() {
        let err = inverse_zigzag(&[1.0, 2.0, 3.0], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            WatermarkError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }
}

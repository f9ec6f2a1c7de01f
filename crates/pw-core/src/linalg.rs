//! Dense Gaussian elimination with row partial pivoting.
//!
//! Chains are a few hundred states at most and are solved once per process,
//! so a straightforward O(n³) elimination over a flat row-major buffer is
//! all that is needed.

use std::ops::{Index, IndexMut};

use crate::error::{GachaError, GachaResult};

/// A dense real matrix stored as one row-major buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a `rows x cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create an `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Build a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> GachaResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(GachaError::DimensionMismatch {
                    rows: rows.len(),
                    cols,
                    rhs: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build a single-column matrix from a vector.
    pub fn column(values: &[f64]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow one row as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Consume the matrix and return its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Multiply by a vector: `self · x`.
    pub fn mul_vec(&self, x: &[f64]) -> GachaResult<Vec<f64>> {
        if x.len() != self.cols {
            return Err(GachaError::DimensionMismatch {
                rows: self.rows,
                cols: self.cols,
                rhs: x.len(),
            });
        }
        Ok((0..self.rows)
            .map(|i| self.row(i).iter().zip(x).map(|(a, b)| a * b).sum())
            .collect())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (r, c): (usize, usize)) -> &f64 {
        &self.data[r * self.cols + c]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64 {
        &mut self.data[r * self.cols + c]
    }
}

/// Solve `a · x = b` for a square matrix `a`.
///
/// Neither input is modified. Fails with [`GachaError::DimensionMismatch`]
/// if `a` is not square or `b` has the wrong length, and with
/// [`GachaError::SingularMatrix`] if a selected pivot is exactly zero.
pub fn solve_linear_system(a: &Matrix, b: &[f64]) -> GachaResult<Vec<f64>> {
    solve_linear_columns(a, &Matrix::column(b)).map(Matrix::into_vec)
}

/// Solve `a · X = rhs` for every column of `rhs` with one elimination pass.
pub fn solve_linear_columns(a: &Matrix, rhs: &Matrix) -> GachaResult<Matrix> {
    if a.rows != a.cols || rhs.rows != a.rows {
        return Err(GachaError::DimensionMismatch {
            rows: a.rows,
            cols: a.cols,
            rhs: rhs.rows,
        });
    }

    let n = a.rows;
    let k = rhs.cols;
    let mut mat = a.data.clone();
    let mut b = rhs.data.clone();

    for i in 0..n {
        let pivot_row = (i + 1..n).fold(i, |best, r| {
            if mat[r * n + i].abs() > mat[best * n + i].abs() {
                r
            } else {
                best
            }
        });
        let pivot = mat[pivot_row * n + i];
        if pivot == 0.0 {
            return Err(GachaError::SingularMatrix { column: i });
        }

        if pivot_row != i {
            swap_rows(&mut mat, n, i, pivot_row);
            swap_rows(&mut b, k, i, pivot_row);
        }

        for v in &mut mat[i * n + i..(i + 1) * n] {
            *v /= pivot;
        }
        for v in &mut b[i * k..(i + 1) * k] {
            *v /= pivot;
        }

        let (mat_head, mat_tail) = mat.split_at_mut((i + 1) * n);
        let pivot_coeffs = &mat_head[i * n + i..];
        let (b_head, b_tail) = b.split_at_mut((i + 1) * k);
        let pivot_rhs = &b_head[i * k..];

        for (row, row_rhs) in mat_tail.chunks_exact_mut(n).zip(b_tail.chunks_exact_mut(k)) {
            let factor = row[i];
            if factor == 0.0 {
                continue;
            }
            for (x, p) in row[i..].iter_mut().zip(pivot_coeffs) {
                *x -= factor * p;
            }
            for (x, p) in row_rhs.iter_mut().zip(pivot_rhs) {
                *x -= factor * p;
            }
        }
    }

    // Back substitution. The diagonal is 1 after normalization.
    let mut x = vec![0.0; n * k];
    for i in (0..n).rev() {
        for col in 0..k {
            let mut sum = b[i * k + col];
            for c in i + 1..n {
                sum -= mat[i * n + c] * x[c * k + col];
            }
            x[i * k + col] = sum;
        }
    }

    Ok(Matrix {
        rows: n,
        cols: k,
        data: x,
    })
}

fn swap_rows(data: &mut [f64], width: usize, lo: usize, hi: usize) {
    let (head, tail) = data.split_at_mut(hi * width);
    head[lo * width..(lo + 1) * width].swap_with_slice(&mut tail[..width]);
}

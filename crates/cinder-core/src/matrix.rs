use std::fmt;

use crate::error::CinderError;
use crate::value::format_number;

const EPSILON: f64 = 1e-10;

/// Largest side accepted by [`Matrix::identity`].
pub const MAX_DIMENSION: usize = 4096;

/// A dense row-major matrix of doubles with at least one row and one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, CinderError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(CinderError::math("matrix must have at least one row and one column"));
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(CinderError::math(format!(
                "matrix row {bad} has {} columns, expected {cols}",
                rows[bad].len()
            )));
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Result<Self, CinderError> {
        if n == 0 {
            return Err(CinderError::math("identity size must be positive"));
        }
        if n > MAX_DIMENSION {
            return Err(CinderError::math(format!(
                "identity size {n} exceeds the limit of {MAX_DIMENSION}"
            )));
        }
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    fn check_same_shape(&self, other: &Matrix, op: &str) -> Result<(), CinderError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(CinderError::math(format!(
                "matrix dimensions do not match for {op}: {}x{} vs {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(())
    }

    fn zip_with(&self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        }
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix, CinderError> {
        self.check_same_shape(other, "addition")?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    pub fn sub(&self, other: &Matrix) -> Result<Matrix, CinderError> {
        self.check_same_shape(other, "subtraction")?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Element-wise product.
    pub fn hadamard(&self, other: &Matrix) -> Result<Matrix, CinderError> {
        self.check_same_shape(other, "element-wise multiplication")?;
        Ok(self.zip_with(other, |a, b| a * b))
    }

    pub fn mul(&self, other: &Matrix) -> Result<Matrix, CinderError> {
        if self.cols != other.rows {
            return Err(CinderError::math(format!(
                "matrix dimensions do not match for multiplication: {}x{} vs {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let sum = (0..self.cols).map(|k| self.at(i, k) * other.at(k, j)).sum();
                out.set(i, j, sum);
            }
        }
        Ok(out)
    }

    pub fn scale(&self, k: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|x| x * k).collect(),
        }
    }

    pub fn negate(&self) -> Matrix {
        self.scale(-1.0)
    }

    pub fn transpose(&self) -> Matrix {
        let mut out = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.at(i, j));
            }
        }
        out
    }

    fn require_square(&self, op: &str) -> Result<(), CinderError> {
        if !self.is_square() {
            return Err(CinderError::math(format!(
                "{op} requires a square matrix, got {}x{}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    pub fn trace(&self) -> Result<f64, CinderError> {
        self.require_square("trace")?;
        Ok((0..self.rows).map(|i| self.at(i, i)).sum())
    }

    /// Gaussian elimination with partial pivoting.
    pub fn det(&self) -> Result<f64, CinderError> {
        self.require_square("det")?;
        let n = self.rows;
        let mut m = self.clone();
        let mut det = 1.0;
        for col in 0..n {
            let pivot = m.pivot_row(col, col);
            if m.at(pivot, col).abs() < EPSILON {
                return Ok(0.0);
            }
            if pivot != col {
                m.swap_rows(pivot, col);
                det = -det;
            }
            let p = m.at(col, col);
            det *= p;
            for row in col + 1..n {
                let factor = m.at(row, col) / p;
                for k in col..n {
                    let v = m.at(row, k) - factor * m.at(col, k);
                    m.set(row, k, v);
                }
            }
        }
        Ok(det)
    }

    /// Number of non-zero rows after reduction to row echelon form.
    pub fn rank(&self) -> usize {
        let mut m = self.clone();
        let mut rank = 0;
        for col in 0..self.cols {
            if rank == self.rows {
                break;
            }
            let pivot = m.pivot_row(rank, col);
            if m.at(pivot, col).abs() < EPSILON {
                continue;
            }
            m.swap_rows(pivot, rank);
            for row in rank + 1..self.rows {
                let factor = m.at(row, col) / m.at(rank, col);
                for k in col..self.cols {
                    let v = m.at(row, k) - factor * m.at(rank, k);
                    m.set(row, k, v);
                }
            }
            rank += 1;
        }
        rank
    }

    /// Gauss-Jordan elimination on `[A | I]`.
    pub fn inverse(&self) -> Result<Matrix, CinderError> {
        self.require_square("inverse")?;
        let n = self.rows;
        let mut a = self.clone();
        let mut inv = Matrix::identity(n)?;
        for col in 0..n {
            let pivot = a.pivot_row(col, col);
            if a.at(pivot, col).abs() < EPSILON {
                return Err(CinderError::math("matrix is singular"));
            }
            a.swap_rows(pivot, col);
            inv.swap_rows(pivot, col);
            let p = a.at(col, col);
            for k in 0..n {
                a.set(col, k, a.at(col, k) / p);
                inv.set(col, k, inv.at(col, k) / p);
            }
            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = a.at(row, col);
                for k in 0..n {
                    a.set(row, k, a.at(row, k) - factor * a.at(col, k));
                    inv.set(row, k, inv.at(row, k) - factor * inv.at(col, k));
                }
            }
        }
        Ok(inv)
    }

    fn pivot_row(&self, from: usize, col: usize) -> usize {
        let mut best = from;
        for row in from + 1..self.rows {
            if self.at(row, col).abs() > self.at(best, col).abs() {
                best = row;
            }
        }
        best
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for k in 0..self.cols {
            self.data.swap(a * self.cols + k, b * self.cols + k);
        }
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.data.chunks(self.cols).enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", format_number(*x))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

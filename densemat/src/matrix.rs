use crate::error::{Error, Result};
use core::{
    borrow::Borrow,
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::{Index, IndexMut, Mul, Neg},
};
use itertools::Itertools;
use num_traits::Zero;

/// Dense `rows x cols` matrix backed by a single contiguous row-major
/// buffer: element `(r, c)` lives at flat offset `r * cols + c`.
///
/// The shape is fixed at construction and both dimensions are
/// non-zero. Arithmetic produces new matrices and never mutates its
/// operands; `set` and `IndexMut` are the only in-place mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Builds a matrix from a row-major buffer of exactly
    /// `rows * cols` elements.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyShape { rows, cols });
        }
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: (rows, cols),
                found: (1, data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored elements, `rows * cols`. Doubles as the
    /// required capacity for [`copy_into`](Self::copy_into).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The backing buffer in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Converts a flat buffer position into `(row, col)` coordinates.
    pub fn coord_of(&self, index: usize) -> Result<(usize, usize)> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfRange {
                index,
                bound: self.data.len(),
            });
        }
        let row = index / self.cols;
        Ok((row, index - self.cols * row))
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        let offset = self.offset_of(row, col)?;
        Ok(&self.data[offset])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let offset = self.offset_of(row, col)?;
        self.data[offset] = value;
        Ok(())
    }

    fn offset_of(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                bound: self.rows,
            });
        }
        if col >= self.cols {
            return Err(Error::IndexOutOfRange {
                index: col,
                bound: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    fn row_slice(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    // Column elements are not contiguous, they sit one stride apart.
    fn col_iter(&self, col: usize) -> impl Iterator<Item = &T> {
        self.data[col..].iter().step_by(self.cols)
    }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }
}

impl<T: Zero + Clone> Matrix<T> {
    /// Matrix with every element set to zero.
    pub fn zero(rows: usize, cols: usize) -> Result<Self> {
        Self::from_vec(rows, cols, vec![T::zero(); rows * cols])
    }
}

impl<T: Clone> Matrix<T> {
    /// Owned copy of row `row`, in column order.
    pub fn row(&self, row: usize) -> Result<Vec<T>> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                bound: self.rows,
            });
        }
        Ok(self.row_slice(row).to_vec())
    }

    /// Owned copy of column `col`, gathered in row order.
    pub fn column(&self, col: usize) -> Result<Vec<T>> {
        if col >= self.cols {
            return Err(Error::IndexOutOfRange {
                index: col,
                bound: self.cols,
            });
        }
        Ok(self.col_iter(col).cloned().collect())
    }

    /// Owned copy of the whole buffer in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.clone()
    }

    /// Copies row `row` into the front of `buf` and returns the
    /// element count written. `buf` must hold at least
    /// [`cols`](Self::cols) elements.
    pub fn copy_row_into(&self, row: usize, buf: &mut [T]) -> Result<usize> {
        if row >= self.rows {
            return Err(Error::IndexOutOfRange {
                index: row,
                bound: self.rows,
            });
        }
        if buf.len() < self.cols {
            return Err(Error::BufferTooSmall {
                required: self.cols,
                capacity: buf.len(),
            });
        }
        buf[..self.cols].clone_from_slice(self.row_slice(row));
        Ok(self.cols)
    }

    /// Copies column `col` into the front of `buf` and returns the
    /// element count written. `buf` must hold at least
    /// [`rows`](Self::rows) elements.
    pub fn copy_column_into(&self, col: usize, buf: &mut [T]) -> Result<usize> {
        if col >= self.cols {
            return Err(Error::IndexOutOfRange {
                index: col,
                bound: self.cols,
            });
        }
        if buf.len() < self.rows {
            return Err(Error::BufferTooSmall {
                required: self.rows,
                capacity: buf.len(),
            });
        }
        buf[..self.rows]
            .iter_mut()
            .zip_eq(self.col_iter(col))
            .for_each(|(dst, src)| *dst = src.clone());
        Ok(self.rows)
    }

    /// Copies the whole buffer into the front of `buf` in row-major
    /// order and returns the element count written.
    pub fn copy_into(&self, buf: &mut [T]) -> Result<usize> {
        if buf.len() < self.data.len() {
            return Err(Error::BufferTooSmall {
                required: self.data.len(),
                capacity: buf.len(),
            });
        }
        buf[..self.data.len()].clone_from_slice(&self.data);
        Ok(self.data.len())
    }

    /// New `cols x rows` matrix with `out(c, r) = self(r, c)`.
    pub fn transpose(&self) -> Self {
        let data = (0..self.cols)
            .flat_map(|col| self.col_iter(col).cloned())
            .collect();
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }
}

impl<T> Matrix<T> {
    /// Elementwise sum. Operands must share a shape.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self>
    where
        for<'t> &'t T: core::ops::Add<&'t T, Output = T>,
    {
        self.check_same_shape(rhs)?;
        let data = self
            .data
            .iter()
            .zip_eq(&rhs.data)
            .map(|(lhs, rhs)| lhs + rhs)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Elementwise difference. Operands must share a shape.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self>
    where
        for<'t> &'t T: core::ops::Sub<&'t T, Output = T>,
    {
        self.check_same_shape(rhs)?;
        let data = self
            .data
            .iter()
            .zip_eq(&rhs.data)
            .map(|(lhs, rhs)| lhs - rhs)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Standard matrix product. Requires `self.cols == rhs.rows`; the
    /// result is `self.rows x rhs.cols` and each cell is the dot
    /// product of a left row with a right column.
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self>
    where
        T: Sum,
        for<'t> &'t T: Mul<&'t T, Output = T>,
    {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch {
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        let data = (0..self.rows)
            .cartesian_product(0..rhs.cols)
            .map(|(row, col)| dot::<T>(self.row_slice(row), rhs.col_iter(col)))
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: rhs.cols,
            data,
        })
    }

    /// Multiplies every element by `scalar`. Multiplying by -1 yields
    /// the elementwise negation.
    pub fn scalar_mul(&self, scalar: &T) -> Self
    where
        for<'t> &'t T: Mul<&'t T, Output = T>,
    {
        let data = self.data.iter().map(|value| value * scalar).collect();
        Self {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }
}

// Accumulates left-to-right, fixing the rounding order for
// floating-point elements.
fn dot<'a, T>(
    lhs: impl IntoIterator<Item = &'a T>,
    rhs: impl IntoIterator<Item = &'a T>,
) -> T
where
    T: Sum + 'a,
    for<'t> &'t T: Mul<&'t T, Output = T>,
{
    lhs.into_iter()
        .zip_eq(rhs)
        .map(|(lhs, rhs)| lhs * rhs)
        .sum()
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        self.get(row, col).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        let offset = self
            .offset_of(row, col)
            .unwrap_or_else(|err| panic!("{err}"));
        &mut self.data[offset]
    }
}

impl<T: Display> Display for Matrix<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut rows = self.data.chunks(self.cols);
        if let Some(first) = rows.next() {
            write!(f, "{}", first.iter().format(","))?;
            rows.try_for_each(|row| write!(f, "\n{}", row.iter().format(",")))?;
        }
        Ok(())
    }
}

impl<T> From<Matrix<T>> for Vec<T> {
    fn from(value: Matrix<T>) -> Self {
        value.data
    }
}

impl<T> Neg for &Matrix<T>
where
    for<'t> &'t T: Neg<Output = T>,
{
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|value| -value).collect(),
        }
    }
}

impl<T: Neg<Output = T>> Neg for Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.into_iter().map(|value| -value).collect(),
        }
    }
}

macro_rules! impl_elementwise_op {
    (@ impl<T> $trait:ident<$rhs:ty> for $lhs:ty; $method:ident) => {
        paste::paste! {
            impl<T> core::ops::$trait<$rhs> for $lhs
            where
                for<'t> &'t T: core::ops::$trait<&'t T, Output = T>,
            {
                type Output = Matrix<T>;

                fn [<$trait:lower>](self, rhs: $rhs) -> Matrix<T> {
                    self.$method(rhs.borrow())
                        .unwrap_or_else(|err| panic!("{err}"))
                }
            }
        }
    };
    ($(impl<T> $trait:ident<Matrix<T>> for Matrix<T>; $method:ident),* $(,)?) => {
        $(
            impl_elementwise_op!(@ impl<T> $trait<Matrix<T>> for Matrix<T>; $method);
            impl_elementwise_op!(@ impl<T> $trait<&Matrix<T>> for Matrix<T>; $method);
            impl_elementwise_op!(@ impl<T> $trait<Matrix<T>> for &Matrix<T>; $method);
            impl_elementwise_op!(@ impl<T> $trait<&Matrix<T>> for &Matrix<T>; $method);
        )*
    };
}

macro_rules! impl_matrix_mul {
    ($(impl<T> Mul<$rhs:ty> for $lhs:ty),* $(,)?) => {
        $(
            impl<T> Mul<$rhs> for $lhs
            where
                T: Sum,
                for<'t> &'t T: Mul<&'t T, Output = T>,
            {
                type Output = Matrix<T>;

                fn mul(self, rhs: $rhs) -> Matrix<T> {
                    self.checked_mul(rhs.borrow())
                        .unwrap_or_else(|err| panic!("{err}"))
                }
            }
        )*
    };
}

macro_rules! impl_scalar_mul {
    ($(impl<T> Mul<$rhs:ty> for $lhs:ty),* $(,)?) => {
        $(
            impl<T> Mul<$rhs> for $lhs
            where
                for<'t> &'t T: Mul<&'t T, Output = T>,
            {
                type Output = Matrix<T>;

                fn mul(self, rhs: $rhs) -> Matrix<T> {
                    self.scalar_mul(rhs.borrow())
                }
            }
        )*
    };
}

impl_elementwise_op!(
    impl<T> Add<Matrix<T>> for Matrix<T>; checked_add,
    impl<T> Sub<Matrix<T>> for Matrix<T>; checked_sub,
);
impl_matrix_mul!(
    impl<T> Mul<Matrix<T>> for Matrix<T>,
    impl<T> Mul<&Matrix<T>> for Matrix<T>,
    impl<T> Mul<Matrix<T>> for &Matrix<T>,
    impl<T> Mul<&Matrix<T>> for &Matrix<T>,
);
impl_scalar_mul!(
    impl<T> Mul<T> for Matrix<T>,
    impl<T> Mul<&T> for Matrix<T>,
    impl<T> Mul<T> for &Matrix<T>,
    impl<T> Mul<&T> for &Matrix<T>,
);

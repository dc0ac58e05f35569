use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Precondition violations reported by [`Matrix`](crate::Matrix).
///
/// Every kind is raised synchronously at the call that detects it and
/// either fully succeeds or leaves the receiver untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A constructor received a zero row or column count.
    #[error("matrix dimensions {rows}x{cols} must both be non-zero")]
    EmptyShape { rows: usize, cols: usize },
    /// Construction data cannot fill the requested shape, or two
    /// operands required to share a shape do not. A flat initializer
    /// is reported as a single row `(1, len)`.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// Matrix-product operands are incompatible: the column count of
    /// the left operand must equal the row count of the right.
    #[error("cannot multiply {lhs:?} by {rhs:?}")]
    DimensionMismatch {
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    /// A row, column, or flat index exceeds the matrix's bounds.
    #[error("index {index} out of range, bound is {bound}")]
    IndexOutOfRange { index: usize, bound: usize },
    /// A caller-supplied destination slice cannot hold the requested
    /// number of elements.
    #[error("buffer holds {capacity} elements, {required} required")]
    BufferTooSmall { required: usize, capacity: usize },
}

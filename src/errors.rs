use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// Errors when constructing a [`Csc`](crate::Csc) matrix from its parts.
#[derive(Clone, Debug, PartialEq)]
pub enum CscError {
    /// The column pointer array does not have `ncols + 1` entries.
    WrongColPtrLength { len: usize, expected: usize },
    /// The first column pointer is not zero.
    ColPtrStart,
    /// The last column pointer does not equal the number of non-zeros.
    ColPtrEnd { end: usize, nnz: usize },
    /// The column pointer decreases at the start of column `col`.
    ColPtrDecreasing { col: usize },
    /// The row index and value arrays have different lengths.
    ValueLengthMismatch { rows: usize, vals: usize },
    /// A row index in column `col` is not less than the row count.
    RowOutOfRange { col: usize, row: usize },
    /// Row `row` appears more than once in column `col`.
    DuplicateRow { col: usize, row: usize },
    /// A dense array does not have `nrows * ncols` elements.
    DenseSizeMismatch { len: usize, expected: usize },
}

impl Display for CscError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::WrongColPtrLength { len, expected } => write!(
                fmt,
                "column pointer length is {} but should be {}",
                len, expected
            ),
            Self::ColPtrStart => write!(fmt, "first column pointer must be zero"),
            Self::ColPtrEnd { end, nnz } => write!(
                fmt,
                "last column pointer is {} but there are {} non-zeros",
                end, nnz
            ),
            Self::ColPtrDecreasing { col } => {
                write!(fmt, "column pointers decrease at column {}", col)
            }
            Self::ValueLengthMismatch { rows, vals } => write!(
                fmt,
                "{} row indices but {} values",
                rows, vals
            ),
            Self::RowOutOfRange { col, row } => {
                write!(fmt, "row index {} in column {} is out of range", row, col)
            }
            Self::DuplicateRow { col, row } => {
                write!(fmt, "row {} appears more than once in column {}", row, col)
            }
            Self::DenseSizeMismatch { len, expected } => write!(
                fmt,
                "dense data has {} elements but shape requires {}",
                len, expected
            ),
        }
    }
}

impl Error for CscError {}

/// Errors with masked matrix multiplication inputs or execution.
#[derive(Clone, Debug, PartialEq)]
pub enum MaskedMatMulError {
    /// Shapes of `a`, `b` and the output `c` are incompatible. Shapes are
    /// `(rows, cols)`.
    ShapeMismatch {
        a: (usize, usize),
        b: (usize, usize),
        c: (usize, usize),
    },
    /// The accumulator set contains no accumulators.
    NoAccumulators,
    /// The accumulators have fewer rows than the output matrix.
    AccumulatorTooSmall { rows: usize, required: usize },
    /// A worker found a row index in the output pattern that is outside the
    /// accumulator.
    RowOutOfRange { col: usize, row: usize, rows: usize },
}

impl Display for MaskedMatMulError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ShapeMismatch { a, b, c } => write!(
                fmt,
                "cannot compute {}x{} masked product of {}x{} and {}x{} matrices",
                c.0, c.1, a.0, a.1, b.0, b.1
            ),
            Self::NoAccumulators => write!(fmt, "at least one accumulator is required"),
            Self::AccumulatorTooSmall { rows, required } => write!(
                fmt,
                "accumulators have {} rows but output has {}",
                rows, required
            ),
            Self::RowOutOfRange { col, row, rows } => write!(
                fmt,
                "output column {} has row {} but accumulators have {} rows",
                col, row, rows
            ),
        }
    }
}

impl Error for MaskedMatMulError {}

//! Errors raised while constructing primitives.

/// Errors from building or decoding primitive types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitivesError {
    /// Share payload is not exactly [`SHARE_SIZE`](crate::SHARE_SIZE) bytes.
    #[error("invalid share size: expected {expected}, got {actual}")]
    InvalidShareSize {
        /// Required size.
        expected: usize,
        /// Size that was provided.
        actual: usize,
    },

    /// Namespace identifier has the wrong width.
    #[error("invalid namespace size: expected {expected}, got {actual}")]
    InvalidNamespaceSize {
        /// Required size.
        expected: usize,
        /// Size that was provided.
        actual: usize,
    },

    /// Root has no row or column commitments.
    #[error("root has no commitments")]
    EmptyRoot,

    /// Row and column commitment counts differ.
    #[error("root is not square: {rows} rows, {columns} columns")]
    NotSquare {
        /// Number of row roots.
        rows: usize,
        /// Number of column roots.
        columns: usize,
    },

    /// Square width is not a power of two.
    #[error("square width {0} is not a power of two")]
    WidthNotPowerOfTwo(usize),

    /// Square width does not fit the coordinate type.
    #[error("square width {0} exceeds the maximum of {max}", max = u16::MAX as usize + 1)]
    WidthTooLarge(usize),

    /// Namespace range of a commitment is inverted.
    #[error("namespace range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Minimum namespace.
        min: crate::NamespaceId,
        /// Maximum namespace.
        max: crate::NamespaceId,
    },
}

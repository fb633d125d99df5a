use thiserror::Error;

use crate::StationStoreError;

/// Errors from [`crate::distance::DistanceProvider::distance_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceError {
    /// Coordinates for the requested stations could not be resolved.
    #[error("failed to resolve station coordinates: {0}")]
    Stations(#[from] StationStoreError),
    /// The distance cache could not be read or written.
    #[error("distance cache failure: {message}")]
    Cache {
        /// Description supplied by the cache backend.
        message: String,
    },
    /// The distance backend could not compute the matrix.
    #[error("distance service failed: {message}")]
    Service {
        /// Description supplied by the backend.
        message: String,
    },
    /// A matrix did not have one row and column per station.
    #[error("distance matrix is {rows}x{columns}, expected {expected}x{expected}")]
    DimensionMismatch {
        /// Number of stations requested.
        expected: usize,
        /// Rows actually returned.
        rows: usize,
        /// Widest row actually returned.
        columns: usize,
    },
}

//! Distance provider traits and the matrix alias shared by them.

use crate::{Station, StationId};

use super::error::DistanceError;

/// Square matrix of driving distances in kilometres.
///
/// `matrix[i][j]` is the distance from station `i` to station `j`; the
/// diagonal is zero. Driving distances are directional, so the matrix need
/// not be symmetric.
pub type DistanceMatrix = Vec<Vec<f64>>;

/// Fetch pairwise driving distances for a set of stations.
///
/// Implementers must return a square `n×n` matrix where `n == ids.len()`.
///
/// # Examples
///
/// ```rust
/// use roadfuel_core::{DistanceError, DistanceMatrix, DistanceProvider, StationId};
///
/// struct UnitProvider;
///
/// impl DistanceProvider for UnitProvider {
///     fn distance_matrix(&self, ids: &[StationId]) -> Result<DistanceMatrix, DistanceError> {
///         let n = ids.len();
///         Ok((0..n)
///             .map(|i| (0..n).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
///             .collect())
///     }
/// }
///
/// let matrix = UnitProvider.distance_matrix(&[1, 2])?;
/// assert_eq!(matrix[0][1], 1.0);
/// # Ok::<(), DistanceError>(())
/// ```
pub trait DistanceProvider {
    /// Return the distance matrix for `ids`, in the order given.
    fn distance_matrix(&self, ids: &[StationId]) -> Result<DistanceMatrix, DistanceError>;
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for &T {
    fn distance_matrix(&self, ids: &[StationId]) -> Result<DistanceMatrix, DistanceError> {
        (**self).distance_matrix(ids)
    }
}

/// Compute distances directly from station coordinates.
///
/// This is the uncached backend behind
/// [`CachedDistanceProvider`](super::CachedDistanceProvider): a routing
/// service client or the great-circle
/// [`HaversineDistanceSource`](super::HaversineDistanceSource).
pub trait DistanceSource {
    /// Return the distance matrix for `stations`, in the order given.
    fn compute(&self, stations: &[Station]) -> Result<DistanceMatrix, DistanceError>;
}

impl<T: DistanceSource + ?Sized> DistanceSource for &T {
    fn compute(&self, stations: &[Station]) -> Result<DistanceMatrix, DistanceError> {
        (**self).compute(stations)
    }
}

/// Check that `matrix` has exactly `expected` rows of `expected` entries.
///
/// # Errors
/// Returns [`DistanceError::DimensionMismatch`] otherwise.
pub fn ensure_square(matrix: &DistanceMatrix, expected: usize) -> Result<(), DistanceError> {
    if matrix.len() == expected && matrix.iter().all(|row| row.len() == expected) {
        return Ok(());
    }
    Err(DistanceError::DimensionMismatch {
        expected,
        rows: matrix.len(),
        columns: matrix.iter().map(Vec::len).max().unwrap_or_default(),
    })
}

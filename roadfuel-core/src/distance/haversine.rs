//! Great-circle distance backend.

use crate::Station;
use crate::geodesy::haversine_km;

use super::error::DistanceError;
use super::provider::{DistanceMatrix, DistanceSource};

/// [`DistanceSource`] using straight-line great-circle distances.
///
/// Less accurate than a routing service, since it ignores the road network,
/// but always available. The resulting matrix is symmetric.
#[derive(Debug, Default, Clone, Copy)]
pub struct HaversineDistanceSource;

impl DistanceSource for HaversineDistanceSource {
    fn compute(&self, stations: &[Station]) -> Result<DistanceMatrix, DistanceError> {
        let n = stations.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for (i, from) in stations.iter().enumerate() {
            for (j, to) in stations.iter().enumerate().skip(i + 1) {
                let d = haversine_km(from.location, to.location);
                if let Some(cell) = matrix.get_mut(i).and_then(|row| row.get_mut(j)) {
                    *cell = d;
                }
                if let Some(cell) = matrix.get_mut(j).and_then(|row| row.get_mut(i)) {
                    *cell = d;
                }
            }
        }
        Ok(matrix)
    }
}

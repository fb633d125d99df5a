//! Data access traits for fuel stations.
//!
//! The `StationStore` trait defines a read-only interface for retrieving
//! [`Station`] values, either by geographic bounding box and price band or by
//! identifier. [`MemoryStationStore`] keeps a dataset in memory and is what
//! the command-line tooling loads JSON datasets into.

use std::collections::HashMap;

use geo::{Intersects, Rect};
use thiserror::Error;

use crate::{PriceRange, Station, StationId};

/// Errors from [`StationStore`] queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StationStoreError {
    /// A requested identifier is not in the store.
    #[error("station {id} does not exist")]
    MissingStation {
        /// The identifier that could not be resolved.
        id: StationId,
    },
    /// The backing storage could not be queried.
    #[error("station storage is unavailable: {message}")]
    Unavailable {
        /// Description supplied by the backend.
        message: String,
    },
}

/// Read-only access to persisted fuel stations.
///
/// The bounding box uses WGS84 coordinates (`x = longitude`, `y = latitude`).
/// Containment includes boundary points.
///
/// # Examples
///
/// ```rust
/// use geo::{Coord, Rect};
/// use roadfuel_core::{MemoryStationStore, PriceRange, Station, StationStore};
///
/// let store = MemoryStationStore::with_stations([Station::new(1, 0.7, Coord { x: 0.0, y: 0.0 })]);
/// let bbox = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 });
///
/// let found = store.find_stations(&bbox, PriceRange::default())?;
/// assert_eq!(found.len(), 1);
/// # Ok::<(), roadfuel_core::StationStoreError>(())
/// ```
pub trait StationStore {
    /// Return all stations inside `bbox` whose price lies within `prices`.
    ///
    /// Regions crossing the antimeridian are not modelled; callers must split
    /// them into two rectangles.
    fn find_stations(
        &self,
        bbox: &Rect<f64>,
        prices: PriceRange,
    ) -> Result<Vec<Station>, StationStoreError>;

    /// Resolve every identifier in `ids`, preserving order.
    ///
    /// Implementations must fail with [`StationStoreError::MissingStation`]
    /// if any identifier is unknown.
    fn stations_by_ids(&self, ids: &[StationId]) -> Result<Vec<Station>, StationStoreError>;
}

impl<T: StationStore + ?Sized> StationStore for &T {
    fn find_stations(
        &self,
        bbox: &Rect<f64>,
        prices: PriceRange,
    ) -> Result<Vec<Station>, StationStoreError> {
        (**self).find_stations(bbox, prices)
    }

    fn stations_by_ids(&self, ids: &[StationId]) -> Result<Vec<Station>, StationStoreError> {
        (**self).stations_by_ids(ids)
    }
}

/// In-memory [`StationStore`] backed by a vector.
///
/// Lookups by bounding box are a linear scan in insertion order; lookups by
/// identifier use a hash index.
#[derive(Default, Debug, Clone)]
pub struct MemoryStationStore {
    stations: Vec<Station>,
    index: HashMap<StationId, usize>,
}

impl MemoryStationStore {
    /// Create a store from a collection of stations.
    ///
    /// When identifiers repeat, the last station with that identifier wins
    /// for lookups by id.
    pub fn with_stations<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = Station>,
    {
        let stations: Vec<Station> = stations.into_iter().collect();
        let index = stations
            .iter()
            .enumerate()
            .map(|(idx, station)| (station.id, idx))
            .collect();
        Self { stations, index }
    }

    /// Number of stored stations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the store holds no stations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationStore for MemoryStationStore {
    fn find_stations(
        &self,
        bbox: &Rect<f64>,
        prices: PriceRange,
    ) -> Result<Vec<Station>, StationStoreError> {
        Ok(self
            .stations
            .iter()
            // `Intersects` treats boundary points as inside the rectangle.
            .filter(|s| bbox.intersects(&s.location) && prices.contains(s.price))
            .cloned()
            .collect())
    }

    fn stations_by_ids(&self, ids: &[StationId]) -> Result<Vec<Station>, StationStoreError> {
        ids.iter()
            .map(|id| {
                self.index
                    .get(id)
                    .and_then(|idx| self.stations.get(*idx))
                    .cloned()
                    .ok_or(StationStoreError::MissingStation { id: *id })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn unit_bbox() -> Rect<f64> {
        Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 1.0, y: 1.0 })
    }

    #[rstest]
    fn returns_stations_inside_bbox(unit_bbox: Rect<f64>) {
        let inside = Station::new(1, 0.7, Coord { x: 0.0, y: 0.0 });
        let outside = Station::new(2, 0.7, Coord { x: 5.0, y: 5.0 });
        let store = MemoryStationStore::with_stations([inside.clone(), outside]);
        let found = store
            .find_stations(&unit_bbox, PriceRange::default())
            .expect("memory store never fails");
        assert_eq!(found, vec![inside]);
    }

    #[rstest]
    #[case(Coord { x: -1.0, y: 0.0 })] // left edge
    #[case(Coord { x: 1.0, y: 0.0 })] // right edge
    #[case(Coord { x: 0.0, y: -1.0 })] // bottom edge
    #[case(Coord { x: 1.0, y: 1.0 })] // top-right corner
    fn includes_station_on_bbox_boundary(unit_bbox: Rect<f64>, #[case] location: Coord<f64>) {
        let station = Station::new(42, 0.7, location);
        let store = MemoryStationStore::with_stations([station.clone()]);
        let found = store
            .find_stations(&unit_bbox, PriceRange::default())
            .expect("memory store never fails");
        assert_eq!(found, vec![station]);
    }

    #[rstest]
    fn filters_by_price(unit_bbox: Rect<f64>) {
        let cheap = Station::new(1, 0.05, Coord { x: 0.0, y: 0.0 });
        let fair = Station::new(2, 0.8, Coord { x: 0.0, y: 0.0 });
        let dear = Station::new(3, 2.5, Coord { x: 0.0, y: 0.0 });
        let store = MemoryStationStore::with_stations([cheap, fair.clone(), dear]);
        let found = store
            .find_stations(&unit_bbox, PriceRange::default())
            .expect("memory store never fails");
        assert_eq!(found, vec![fair]);
    }

    #[rstest]
    fn stations_by_ids_preserves_request_order() {
        let a = Station::new(1, 0.7, Coord { x: 0.0, y: 0.0 });
        let b = Station::new(2, 0.8, Coord { x: 1.0, y: 0.0 });
        let store = MemoryStationStore::with_stations([a.clone(), b.clone()]);
        let found = store.stations_by_ids(&[2, 1]).expect("both ids exist");
        assert_eq!(found, vec![b, a]);
    }

    #[rstest]
    fn stations_by_ids_fails_on_unknown_id() {
        let store = MemoryStationStore::with_stations([Station::new(1, 0.7, Coord { x: 0.0, y: 0.0 })]);
        let err = store
            .stations_by_ids(&[1, 9])
            .expect_err("id 9 is unknown");
        assert_eq!(err, StationStoreError::MissingStation { id: 9 });
    }

    #[rstest]
    fn empty_store_returns_nothing(unit_bbox: Rect<f64>) {
        let store = MemoryStationStore::default();
        assert!(store.is_empty());
        let found = store
            .find_stations(&unit_bbox, PriceRange::default())
            .expect("memory store never fails");
        assert!(found.is_empty());
    }
}

//! Deterministic collaborators for unit and behaviour tests.
//!
//! Enabled in downstream crates through the `test-support` feature.

use std::cell::RefCell;

use geo::{Coord, Rect};

use crate::{
    DistanceError, DistanceMatrix, DistanceProvider, PathError, PathProvider, PlanObserver,
    PriceRange, Route, Station, StationId, StationMarker, StationStore, StationStoreError,
    TripPath,
};

/// Build a station at `(lon, lat)`.
#[must_use]
pub const fn station(id: StationId, price: f64, lon: f64, lat: f64) -> Station {
    Station::new(id, price, Coord { x: lon, y: lat })
}

/// [`PathProvider`] returning a fixed polyline regardless of endpoints.
#[derive(Debug, Clone)]
pub struct FixedPathProvider {
    points: Vec<Coord<f64>>,
}

impl FixedPathProvider {
    /// Always return `points`.
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        Self {
            points: points.into_iter().collect(),
        }
    }
}

impl PathProvider for FixedPathProvider {
    fn path(&self, _departure: Coord<f64>, _arrival: Coord<f64>) -> Result<TripPath, PathError> {
        TripPath::new(self.points.clone())
    }
}

/// [`PathProvider`] that always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingPathProvider;

impl PathProvider for FailingPathProvider {
    fn path(&self, _departure: Coord<f64>, _arrival: Coord<f64>) -> Result<TripPath, PathError> {
        Err(PathError::Service {
            message: "routing unavailable".to_owned(),
        })
    }
}

/// [`StationStore`] that always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStationStore;

impl StationStore for FailingStationStore {
    fn find_stations(
        &self,
        _bbox: &Rect<f64>,
        _prices: PriceRange,
    ) -> Result<Vec<Station>, StationStoreError> {
        Err(StationStoreError::Unavailable {
            message: "store offline".to_owned(),
        })
    }

    fn stations_by_ids(&self, _ids: &[StationId]) -> Result<Vec<Station>, StationStoreError> {
        Err(StationStoreError::Unavailable {
            message: "store offline".to_owned(),
        })
    }
}

/// [`DistanceProvider`] backed by a fixed matrix over known identifiers.
///
/// Requests for any subset or reordering of the known identifiers are served
/// by slicing the matrix.
#[derive(Debug, Clone)]
pub struct FixedDistanceProvider {
    ids: Vec<StationId>,
    matrix: DistanceMatrix,
}

impl FixedDistanceProvider {
    /// Serve `matrix`, whose rows and columns follow `ids`.
    #[must_use]
    pub const fn new(ids: Vec<StationId>, matrix: DistanceMatrix) -> Self {
        Self { ids, matrix }
    }

    /// Distances along a line: station `k` sits at `offsets[k]` kilometres.
    #[must_use]
    pub fn on_a_line(ids: Vec<StationId>, offsets: &[f64]) -> Self {
        let matrix = offsets
            .iter()
            .map(|from| offsets.iter().map(|to| line_distance(*from, *to)).collect())
            .collect();
        Self::new(ids, matrix)
    }

    fn position(&self, id: StationId) -> Result<usize, DistanceError> {
        self.ids
            .iter()
            .position(|known| *known == id)
            .ok_or(DistanceError::Stations(StationStoreError::MissingStation {
                id,
            }))
    }
}

fn line_distance(from: f64, to: f64) -> f64 {
    (to - from).abs()
}

impl DistanceProvider for FixedDistanceProvider {
    fn distance_matrix(&self, ids: &[StationId]) -> Result<DistanceMatrix, DistanceError> {
        let positions = ids
            .iter()
            .map(|id| self.position(*id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(positions
            .iter()
            .map(|i| {
                positions
                    .iter()
                    .map(|j| {
                        self.matrix
                            .get(*i)
                            .and_then(|row| row.get(*j))
                            .copied()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect())
    }
}

/// [`DistanceProvider`] that always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingDistanceProvider;

impl DistanceProvider for FailingDistanceProvider {
    fn distance_matrix(&self, _ids: &[StationId]) -> Result<DistanceMatrix, DistanceError> {
        Err(DistanceError::Service {
            message: "distance service offline".to_owned(),
        })
    }
}

/// [`PlanObserver`] that remembers what it was told.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    /// Number of points in the notified path.
    pub path_points: RefCell<Option<usize>>,
    /// Identifiers of the notified candidates.
    pub candidates: RefCell<Vec<StationId>>,
    /// Identifiers of the stations the notified route stops at.
    pub route: RefCell<Vec<StationId>>,
    /// Identifiers flagged as stops among the markers.
    pub marked_stops: RefCell<Vec<StationId>>,
}

impl PlanObserver for RecordingObserver {
    fn on_path(&self, path: &TripPath) {
        *self.path_points.borrow_mut() = Some(path.len());
    }

    fn on_candidates(&self, candidates: &[Station]) {
        *self.candidates.borrow_mut() = candidates.iter().map(|s| s.id).collect();
    }

    fn on_route(&self, route: &Route, markers: &[StationMarker]) {
        *self.route.borrow_mut() = route.station_ids().collect();
        *self.marked_stops.borrow_mut() = markers
            .iter()
            .filter(|m| m.is_stop)
            .map(|m| m.station.id)
            .collect();
    }
}

//! Fixtures for composing solve CLI inputs on disk.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use roadfuel_core::{Station, TripRequest};
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// A temporary directory holding a request and a station dataset.
pub(super) struct SolveFiles {
    _dir: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) request_path: Utf8PathBuf,
    pub(super) stations_path: Utf8PathBuf,
}

impl SolveFiles {
    /// Paths inside a fresh directory; nothing is written yet.
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        let request_path = root.join("request.json");
        let stations_path = root.join("stations.json");
        Self {
            _dir: dir,
            root,
            request_path,
            stations_path,
        }
    }

    pub(super) fn write_request(&self, request: &TripRequest) {
        let payload = serde_json::to_string_pretty(request).expect("serialize request");
        write_utf8(&self.request_path, payload.as_bytes());
    }

    pub(super) fn write_stations(&self, stations: &[Station]) {
        let payload = serde_json::to_string_pretty(stations).expect("serialize stations");
        write_utf8(&self.stations_path, payload.as_bytes());
    }
}

/// A trip along one degree of the equator.
pub(super) fn sample_request() -> TripRequest {
    TripRequest {
        departure: Coord { x: 0.0, y: 0.0 },
        arrival: Coord { x: 1.0, y: 0.0 },
        fuel_efficiency: 10.0,
        tank_capacity: 40.0,
        minimum_purchase: 0.0,
        autonomy_margin: 0.0,
        initial_fuel: 0.0,
        segment_length: 100.0,
        search_distance: 5.0,
    }
}

/// Stations just inside each end of [`sample_request`].
pub(super) fn sample_stations() -> Vec<Station> {
    vec![
        Station::new(1, 1.0, Coord { x: 0.001, y: 0.0 }).with_address("Via Roma 1"),
        Station::new(2, 1.5, Coord { x: 0.999, y: 0.0 }),
    ]
}

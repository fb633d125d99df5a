//! Behavioural tests for `CachedDistanceProvider`.

use std::cell::{Cell, RefCell};

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use roadfuel_core::{
    CachedDistanceProvider, DistanceError, DistanceMatrix, DistanceProvider, DistanceSource,
    HaversineDistanceSource, MemoryDistanceCache, MemoryStationStore, Station, StationStoreError,
};

/// Haversine source that counts how often it is consulted.
#[derive(Default)]
struct CountingSource {
    calls: Cell<usize>,
}

impl DistanceSource for CountingSource {
    fn compute(&self, stations: &[Station]) -> Result<DistanceMatrix, DistanceError> {
        self.calls.set(self.calls.get() + 1);
        HaversineDistanceSource.compute(stations)
    }
}

const fn station(id: u64, price: f64, lon: f64, lat: f64) -> Station {
    Station::new(id, price, Coord { x: lon, y: lat })
}

#[fixture]
fn store() -> MemoryStationStore {
    MemoryStationStore::with_stations([
        station(1, 0.70, 9.0, 45.0),
        station(2, 0.80, 9.5, 45.0),
        station(3, 0.75, 10.0, 45.0),
    ])
}

#[fixture]
fn cache() -> MemoryDistanceCache {
    MemoryDistanceCache::default()
}

#[fixture]
fn source() -> CountingSource {
    CountingSource::default()
}

#[fixture]
fn result() -> RefCell<Result<DistanceMatrix, DistanceError>> {
    RefCell::new(Ok(Vec::new()))
}

#[given("an empty distance cache over three stations")]
fn given_empty_cache(#[from(cache)] cache: &MemoryDistanceCache) {
    assert!(cache.is_empty());
}

#[when("I request distances for all three stations")]
fn request_all(
    #[from(store)] store: &MemoryStationStore,
    #[from(cache)] cache: &MemoryDistanceCache,
    #[from(source)] source: &CountingSource,
    #[from(result)] result: &RefCell<Result<DistanceMatrix, DistanceError>>,
) {
    let provider = CachedDistanceProvider::new(cache, store, source);
    *result.borrow_mut() = provider.distance_matrix(&[1, 2, 3]);
}

#[when("I request distances for all three stations twice")]
fn request_all_twice(
    #[from(store)] store: &MemoryStationStore,
    #[from(cache)] cache: &MemoryDistanceCache,
    #[from(source)] source: &CountingSource,
    #[from(result)] result: &RefCell<Result<DistanceMatrix, DistanceError>>,
) {
    let provider = CachedDistanceProvider::new(cache, store, source);
    let first = provider.distance_matrix(&[1, 2, 3]).expect("first request");
    let second = provider.distance_matrix(&[1, 2, 3]).expect("second request");
    assert_eq!(first, second);
    *result.borrow_mut() = Ok(second);
}

#[when("I request distances including an unknown station")]
fn request_unknown(
    #[from(store)] store: &MemoryStationStore,
    #[from(cache)] cache: &MemoryDistanceCache,
    #[from(source)] source: &CountingSource,
    #[from(result)] result: &RefCell<Result<DistanceMatrix, DistanceError>>,
) {
    let provider = CachedDistanceProvider::new(cache, store, source);
    *result.borrow_mut() = provider.distance_matrix(&[1, 42]);
}

#[then("a 3x3 matrix with a zero diagonal is returned")]
fn then_matrix(#[from(result)] result: &RefCell<Result<DistanceMatrix, DistanceError>>) {
    let borrow = result.borrow();
    let matrix = borrow.as_ref().expect("expected Ok result");
    assert_eq!(matrix.len(), 3);
    for (i, row) in matrix.iter().enumerate() {
        assert_eq!(row.len(), 3);
        assert_eq!(row[i], 0.0);
    }
    assert!(matrix[0][2] > matrix[0][1]);
}

#[then("the cache holds 6 pairs")]
fn then_cache_filled(#[from(cache)] cache: &MemoryDistanceCache) {
    assert_eq!(cache.len(), 6);
}

#[then("the distance source was consulted once")]
fn then_consulted_once(#[from(source)] source: &CountingSource) {
    assert_eq!(source.calls.get(), 1);
}

#[then("a missing station error is returned")]
fn then_missing(#[from(result)] result: &RefCell<Result<DistanceMatrix, DistanceError>>) {
    assert_eq!(
        *result.borrow(),
        Err(DistanceError::Stations(StationStoreError::MissingStation {
            id: 42
        }))
    );
}

#[scenario(path = "tests/features/distance_cache.feature", index = 0)]
fn missing_pairs_are_cached(
    store: MemoryStationStore,
    cache: MemoryDistanceCache,
    source: CountingSource,
    result: RefCell<Result<DistanceMatrix, DistanceError>>,
) {
    let _ = (store, cache, source, result);
}

#[scenario(path = "tests/features/distance_cache.feature", index = 1)]
fn repeated_request_hits_cache(
    store: MemoryStationStore,
    cache: MemoryDistanceCache,
    source: CountingSource,
    result: RefCell<Result<DistanceMatrix, DistanceError>>,
) {
    let _ = (store, cache, source, result);
}

#[scenario(path = "tests/features/distance_cache.feature", index = 2)]
fn unknown_station_is_reported(
    store: MemoryStationStore,
    cache: MemoryDistanceCache,
    source: CountingSource,
    result: RefCell<Result<DistanceMatrix, DistanceError>>,
) {
    let _ = (store, cache, source, result);
}

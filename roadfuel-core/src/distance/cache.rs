//! Read-through distance caching.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use crate::{StationId, StationStore};

use super::error::DistanceError;
use super::provider::{DistanceMatrix, DistanceProvider, DistanceSource, ensure_square};

/// Ordered `(from, to)` station pair used as a cache key.
pub type StationPair = (StationId, StationId);

/// Storage for previously computed distances.
///
/// Entries are keyed by ordered pairs since driving distances are
/// directional. Writes must be idempotent: distances are a deterministic
/// function of the pair, so concurrent fills of the same pair are benign.
pub trait DistanceCache {
    /// Return every cached pair whose endpoints are both in `ids`.
    fn cached_pairs(&self, ids: &[StationId]) -> Result<HashMap<StationPair, f64>, DistanceError>;

    /// Insert or overwrite the given pairs.
    fn store_pairs(&self, pairs: &HashMap<StationPair, f64>) -> Result<(), DistanceError>;
}

impl<T: DistanceCache + ?Sized> DistanceCache for &T {
    fn cached_pairs(&self, ids: &[StationId]) -> Result<HashMap<StationPair, f64>, DistanceError> {
        (**self).cached_pairs(ids)
    }

    fn store_pairs(&self, pairs: &HashMap<StationPair, f64>) -> Result<(), DistanceError> {
        (**self).store_pairs(pairs)
    }
}

impl<T: DistanceCache + ?Sized> DistanceCache for Arc<T> {
    fn cached_pairs(&self, ids: &[StationId]) -> Result<HashMap<StationPair, f64>, DistanceError> {
        (**self).cached_pairs(ids)
    }

    fn store_pairs(&self, pairs: &HashMap<StationPair, f64>) -> Result<(), DistanceError> {
        (**self).store_pairs(pairs)
    }
}

/// Thread-safe in-memory [`DistanceCache`].
#[derive(Debug, Default)]
pub struct MemoryDistanceCache {
    pairs: RwLock<HashMap<StationPair, f64>>,
}

impl MemoryDistanceCache {
    /// Create a cache pre-filled with `pairs`.
    pub fn with_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (StationPair, f64)>,
    {
        Self {
            pairs: RwLock::new(pairs.into_iter().collect()),
        }
    }

    /// Number of cached pairs.
    ///
    /// A poisoned lock reports zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.read().map(|pairs| pairs.len()).unwrap_or_default()
    }

    /// Whether nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached distance for a single ordered pair.
    #[must_use]
    pub fn get(&self, from: StationId, to: StationId) -> Option<f64> {
        self.pairs
            .read()
            .ok()
            .and_then(|pairs| pairs.get(&(from, to)).copied())
    }
}

fn poisoned() -> DistanceError {
    DistanceError::Cache {
        message: "distance cache lock poisoned".to_owned(),
    }
}

impl DistanceCache for MemoryDistanceCache {
    fn cached_pairs(&self, ids: &[StationId]) -> Result<HashMap<StationPair, f64>, DistanceError> {
        let pairs = self.pairs.read().map_err(|_| poisoned())?;
        let wanted: BTreeSet<StationId> = ids.iter().copied().collect();
        Ok(pairs
            .iter()
            .filter(|((from, to), _)| wanted.contains(from) && wanted.contains(to))
            .map(|(pair, distance)| (*pair, *distance))
            .collect())
    }

    fn store_pairs(&self, new_pairs: &HashMap<StationPair, f64>) -> Result<(), DistanceError> {
        let mut pairs = self.pairs.write().map_err(|_| poisoned())?;
        pairs.extend(new_pairs.iter().map(|(pair, distance)| (*pair, *distance)));
        Ok(())
    }
}

/// [`DistanceProvider`] that consults a cache before computing distances.
///
/// Only the pairs missing from the cache are computed. Coordinates are
/// fetched for just the stations involved in a missing pair, the backend
/// computes their sub-matrix, and the new pairs are merged into the cache
/// before the full matrix is returned.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadfuel_core::{
///     CachedDistanceProvider, DistanceProvider, HaversineDistanceSource, MemoryDistanceCache,
///     MemoryStationStore, Station,
/// };
///
/// let store = MemoryStationStore::with_stations([
///     Station::new(1, 0.7, Coord { x: 0.0, y: 0.0 }),
///     Station::new(2, 0.7, Coord { x: 0.0, y: 1.0 }),
/// ]);
/// let cache = MemoryDistanceCache::default();
/// let provider = CachedDistanceProvider::new(&cache, &store, HaversineDistanceSource);
///
/// let matrix = provider.distance_matrix(&[1, 2])?;
/// assert!(matrix[0][1] > 111.0);
/// assert_eq!(cache.len(), 2);
/// # Ok::<(), roadfuel_core::DistanceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct CachedDistanceProvider<C, S, D>
where
    C: DistanceCache,
    S: StationStore,
    D: DistanceSource,
{
    cache: C,
    store: S,
    source: D,
}

impl<C, S, D> CachedDistanceProvider<C, S, D>
where
    C: DistanceCache,
    S: StationStore,
    D: DistanceSource,
{
    /// Layer `cache` over `source`, resolving coordinates through `store`.
    pub const fn new(cache: C, store: S, source: D) -> Self {
        Self {
            cache,
            store,
            source,
        }
    }

    /// The cache consulted before computing distances.
    pub const fn cache(&self) -> &C {
        &self.cache
    }
}

impl<C, S, D> DistanceProvider for CachedDistanceProvider<C, S, D>
where
    C: DistanceCache,
    S: StationStore,
    D: DistanceSource,
{
    fn distance_matrix(&self, ids: &[StationId]) -> Result<DistanceMatrix, DistanceError> {
        let n = ids.len();
        if n <= 1 {
            return Ok(vec![vec![0.0; n]; n]);
        }

        let cached = self.cache.cached_pairs(ids)?;
        let mut matrix = vec![vec![0.0; n]; n];
        let mut missing: Vec<(usize, usize)> = Vec::new();
        for (i, from) in ids.iter().enumerate() {
            for (j, to) in ids.iter().enumerate() {
                if from == to {
                    continue;
                }
                match cached.get(&(*from, *to)) {
                    Some(distance) => set_cell(&mut matrix, i, j, *distance),
                    None => missing.push((i, j)),
                }
            }
        }

        if missing.is_empty() {
            log::debug!("distances for {n} stations were all cached");
            return Ok(matrix);
        }
        log::debug!("missing distances for {} pairs", missing.len());

        // Positions in `ids` that take part in at least one missing pair.
        let involved: BTreeSet<usize> = missing.iter().flat_map(|&(i, j)| [i, j]).collect();
        let local: HashMap<usize, usize> = involved
            .iter()
            .enumerate()
            .map(|(local_idx, &pos)| (pos, local_idx))
            .collect();
        let involved_ids: Vec<StationId> = involved
            .iter()
            .filter_map(|&pos| ids.get(pos).copied())
            .collect();

        let stations = self.store.stations_by_ids(&involved_ids)?;
        let computed = self.source.compute(&stations)?;
        ensure_square(&computed, involved_ids.len())?;

        let mut fresh = HashMap::with_capacity(missing.len());
        for &(i, j) in &missing {
            let distance = local
                .get(&i)
                .zip(local.get(&j))
                .and_then(|(li, lj)| computed.get(*li).and_then(|row| row.get(*lj)))
                .copied()
                .unwrap_or_default();
            set_cell(&mut matrix, i, j, distance);
            if let (Some(from), Some(to)) = (ids.get(i), ids.get(j)) {
                fresh.insert((*from, *to), distance);
            }
        }

        self.cache.store_pairs(&fresh)?;
        Ok(matrix)
    }
}

fn set_cell(matrix: &mut DistanceMatrix, i: usize, j: usize, value: f64) {
    if let Some(cell) = matrix.get_mut(i).and_then(|row| row.get_mut(j)) {
        *cell = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DistanceError, MemoryStationStore, Station};
    use geo::Coord;
    use rstest::{fixture, rstest};
    use std::cell::RefCell;

    /// Source that records which stations it was asked about.
    #[derive(Default)]
    struct RecordingSource {
        calls: RefCell<Vec<Vec<StationId>>>,
    }

    impl DistanceSource for RecordingSource {
        fn compute(&self, stations: &[crate::Station]) -> Result<DistanceMatrix, DistanceError> {
            self.calls
                .borrow_mut()
                .push(stations.iter().map(|s| s.id).collect());
            let n = stations.len();
            Ok((0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| if i == j { 0.0 } else { 10.0 })
                        .collect()
                })
                .collect())
        }
    }

    #[fixture]
    fn store() -> MemoryStationStore {
        MemoryStationStore::with_stations([
            Station::new(1, 0.7, Coord { x: 0.0, y: 0.0 }),
            Station::new(2, 0.7, Coord { x: 0.0, y: 1.0 }),
            Station::new(3, 0.7, Coord { x: 0.0, y: 2.0 }),
        ])
    }

    #[rstest]
    fn trivial_inputs_skip_collaborators(store: MemoryStationStore) {
        let source = RecordingSource::default();
        let cache = MemoryDistanceCache::default();
        let provider = CachedDistanceProvider::new(&cache, &store, &source);
        assert!(provider.distance_matrix(&[]).expect("empty").is_empty());
        assert_eq!(provider.distance_matrix(&[1]).expect("single"), vec![vec![0.0]]);
        assert!(source.calls.borrow().is_empty());
    }

    #[rstest]
    fn fills_cache_on_miss(store: MemoryStationStore) {
        let source = RecordingSource::default();
        let cache = MemoryDistanceCache::default();
        let provider = CachedDistanceProvider::new(&cache, &store, &source);
        let matrix = provider.distance_matrix(&[1, 2]).expect("matrix");
        assert_eq!(matrix, vec![vec![0.0, 10.0], vec![10.0, 0.0]]);
        assert_eq!(cache.get(1, 2), Some(10.0));
        assert_eq!(cache.get(2, 1), Some(10.0));
    }

    #[rstest]
    fn fully_cached_request_does_not_compute(store: MemoryStationStore) {
        let source = RecordingSource::default();
        let cache = MemoryDistanceCache::with_pairs([((1, 2), 4.0), ((2, 1), 5.0)]);
        let provider = CachedDistanceProvider::new(&cache, &store, &source);
        let matrix = provider.distance_matrix(&[1, 2]).expect("matrix");
        assert_eq!(matrix, vec![vec![0.0, 4.0], vec![5.0, 0.0]]);
        assert!(source.calls.borrow().is_empty());
    }

    #[rstest]
    fn computes_only_stations_in_missing_pairs(store: MemoryStationStore) {
        let source = RecordingSource::default();
        let cache = MemoryDistanceCache::with_pairs([
            ((1, 2), 4.0),
            ((2, 1), 4.0),
            ((1, 3), 6.0),
            ((3, 1), 6.0),
        ]);
        let provider = CachedDistanceProvider::new(&cache, &store, &source);
        let matrix = provider.distance_matrix(&[1, 2, 3]).expect("matrix");
        assert_eq!(source.calls.borrow().as_slice(), &[vec![2, 3]]);
        assert_eq!(matrix[0][1], 4.0);
        assert_eq!(matrix[0][2], 6.0);
        assert_eq!(matrix[1][2], 10.0);
        assert_eq!(matrix[2][1], 10.0);
        assert_eq!(cache.len(), 6);
    }

    #[rstest]
    fn second_request_is_served_from_cache(store: MemoryStationStore) {
        let source = RecordingSource::default();
        let cache = MemoryDistanceCache::default();
        let provider = CachedDistanceProvider::new(&cache, &store, &source);
        let first = provider.distance_matrix(&[1, 2, 3]).expect("first");
        let second = provider.distance_matrix(&[3, 1]).expect("second");
        assert_eq!(source.calls.borrow().len(), 1);
        assert_eq!(second, vec![vec![0.0, first[2][0]], vec![first[0][2], 0.0]]);
    }

    #[rstest]
    fn unknown_station_is_reported(store: MemoryStationStore) {
        let source = RecordingSource::default();
        let cache = MemoryDistanceCache::default();
        let provider = CachedDistanceProvider::new(&cache, &store, &source);
        let err = provider
            .distance_matrix(&[1, 99])
            .expect_err("station 99 is unknown");
        assert!(matches!(err, DistanceError::Stations(_)));
        assert!(cache.is_empty());
    }
}

//! Reduce the stations around a path to a short, ordered candidate list.
//!
//! Selection runs in four passes:
//!
//! 1. Fetch plausible stations in the path's bounding box, padded by twice the
//!    search margins, and keep those within the margins of some path point.
//!    The test is per axis, not a true distance to the polyline.
//! 2. Order them by the index of their nearest path point.
//! 3. Cut the path into evenly spaced windows by point index, each
//!    overlapping half of the next, and keep the cheapest station of each.
//! 4. Anchor the list with the cheapest stations near the departure and the
//!    arrival, then drop repeated identifiers.

use std::collections::HashSet;

use geo::{Coord, Rect};
use roadfuel_core::geodesy::{latitude_margin, longitude_margin};
use roadfuel_core::{PlanError, Station, StationStore, StoreStage, TripPath, TripRequest};

use crate::PlannerConfig;

/// Fewest cuts placed along a path; two cuts form a single window.
const MIN_CUTS: usize = 2;

/// Builds the candidate list for a trip.
pub struct CandidateSelector<'a, S: StationStore> {
    store: &'a S,
    config: &'a PlannerConfig,
}

impl<'a, S: StationStore> CandidateSelector<'a, S> {
    /// Select from `store` using the thresholds in `config`.
    pub const fn new(store: &'a S, config: &'a PlannerConfig) -> Self {
        Self { store, config }
    }

    /// Produce the ordered candidate list for `request` along `path`.
    ///
    /// # Errors
    /// - [`PlanError::StationStore`] naming the failed lookup.
    /// - [`PlanError::NoStationsFound`] when the store has nothing around
    ///   the path.
    /// - [`PlanError::NoCandidates`] when no station is close to the path.
    /// - [`PlanError::UnsupportedLatitude`] near the poles.
    #[expect(clippy::float_arithmetic, reason = "endpoint search distances are scaled")]
    pub fn select(&self, path: &TripPath, request: &TripRequest) -> Result<Vec<Station>, PlanError> {
        let along = self.along_path(path, request)?;
        let mut candidates = cheapest_per_window(path, request.segment_length, along);
        if candidates.is_empty() {
            return Err(PlanError::NoCandidates);
        }
        log::info!("reduced options to {} stations", candidates.len());

        let departure = self.cheapest_near(
            request.departure,
            request.search_distance * self.config.departure_search_factor,
            StoreStage::NearDeparture,
        )?;
        if let Some(station) = departure
            && candidates.first().is_none_or(|first| first.id != station.id)
        {
            log::debug!("adding departure station {}", station.id);
            candidates.insert(0, station);
        }

        let arrival = self.cheapest_near(
            request.arrival,
            request.search_distance * self.config.arrival_search_factor,
            StoreStage::NearArrival,
        )?;
        if let Some(station) = arrival
            && candidates.last().is_none_or(|last| last.id != station.id)
        {
            log::debug!("adding arrival station {}", station.id);
            candidates.push(station);
        }

        Ok(dedupe_by_id(candidates))
    }

    /// Plausible stations near the path, with their nearest path index.
    fn along_path(
        &self,
        path: &TripPath,
        request: &TripRequest,
    ) -> Result<Vec<(usize, Station)>, PlanError> {
        let bounds = path.bounding_rect();
        let widest = bounds.min().y.abs().max(bounds.max().y.abs());
        let margins = search_margins(request.search_distance, widest)?;
        let bbox = pad(bounds, margins.scaled(2.0));

        let found = self
            .store
            .find_stations(&bbox, self.config.price_range)
            .map_err(|source| PlanError::StationStore {
                stage: StoreStage::AlongPath,
                source,
            })?;
        if found.is_empty() {
            return Err(PlanError::NoStationsFound);
        }
        log::debug!("retrieved {} stations around the path", found.len());

        let mut near: Vec<(usize, Station)> = found
            .into_iter()
            .filter(|station| self.is_plausible(station))
            .filter(|station| margins.any_point_near(path.points(), station.location))
            .map(|station| (path.nearest_index(station.location), station))
            .collect();
        if near.is_empty() {
            return Err(PlanError::NoCandidates);
        }
        near.sort_by_key(|(position, _)| *position);
        log::debug!("found {} candidates near the path", near.len());
        Ok(near)
    }

    fn cheapest_near(
        &self,
        point: Coord<f64>,
        distance_km: f64,
        stage: StoreStage,
    ) -> Result<Option<Station>, PlanError> {
        let margins = search_margins(distance_km, point.y)?;
        let bbox = pad(Rect::new(point, point), margins);
        let found = self
            .store
            .find_stations(&bbox, self.config.price_range)
            .map_err(|source| PlanError::StationStore { stage, source })?;
        Ok(cheapest(found.into_iter().filter(|s| self.is_plausible(s))))
    }

    const fn is_plausible(&self, station: &Station) -> bool {
        station.price >= self.config.min_plausible_price
    }
}

/// Half-widths, in degrees, of an axis-aligned search box.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Margins {
    lat: f64,
    lon: f64,
}

impl Margins {
    #[expect(clippy::float_arithmetic, reason = "margins scale linearly")]
    const fn scaled(self, factor: f64) -> Self {
        Self {
            lat: self.lat * factor,
            lon: self.lon * factor,
        }
    }

    #[expect(clippy::float_arithmetic, reason = "per-axis coordinate differences")]
    fn any_point_near(self, points: &[Coord<f64>], location: Coord<f64>) -> bool {
        points.iter().any(|p| {
            (p.y - location.y).abs() < self.lat && (p.x - location.x).abs() < self.lon
        })
    }
}

fn search_margins(distance_km: f64, latitude: f64) -> Result<Margins, PlanError> {
    let lon = longitude_margin(distance_km, latitude)
        .ok_or(PlanError::UnsupportedLatitude { latitude })?;
    Ok(Margins {
        lat: latitude_margin(distance_km),
        lon,
    })
}

#[expect(clippy::float_arithmetic, reason = "bounding boxes grow by the margins")]
fn pad(rect: Rect<f64>, margins: Margins) -> Rect<f64> {
    Rect::new(
        Coord {
            x: rect.min().x - margins.lon,
            y: rect.min().y - margins.lat,
        },
        Coord {
            x: rect.max().x + margins.lon,
            y: rect.max().y + margins.lat,
        },
    )
}

/// Cheapest station, keeping the first on ties.
fn cheapest(stations: impl IntoIterator<Item = Station>) -> Option<Station> {
    stations.into_iter().fold(None, |best: Option<Station>, station| match best {
        Some(current) if current.price <= station.price => Some(current),
        _ => Some(station),
    })
}

/// Point indices splitting a path of `points` points into windows.
///
/// The cut count is `ceil(2 × length / segment_length)`, clamped between two
/// and the number of points, and cuts are spread evenly by index.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "cut positions are rounded, non-negative point indices"
)]
fn cut_points(points: usize, length_km: f64, segment_length: f64) -> Vec<usize> {
    let ceiling = points.max(MIN_CUTS);
    let wanted = (2.0 * length_km / segment_length).ceil();
    let cuts = if wanted.is_finite() && wanted > 0.0 {
        (wanted as usize).clamp(MIN_CUTS, ceiling)
    } else {
        MIN_CUTS
    };
    let spacing = points as f64 / cuts as f64;
    (0..=cuts).map(|k| (k as f64 * spacing).round() as usize).collect()
}

/// Keep the cheapest station of each overlapping window.
///
/// Window `s` spans the candidates whose position lies after cut `s - 2` and
/// up to cut `s`; the first window starts at the beginning and the last runs
/// to the end. A pick equal to the previous pick is not repeated.
fn cheapest_per_window(
    path: &TripPath,
    segment_length: f64,
    along: Vec<(usize, Station)>,
) -> Vec<Station> {
    let cuts = cut_points(path.len(), path.total_length(), segment_length);
    let positions: Vec<usize> = along.iter().map(|(position, _)| *position).collect();
    let stations: Vec<Station> = along.into_iter().map(|(_, station)| station).collect();
    window_picks(&positions, &stations, &cuts)
        .into_iter()
        .filter_map(|idx| stations.get(idx).cloned())
        .collect()
}

fn window_picks(positions: &[usize], stations: &[Station], cuts: &[usize]) -> Vec<usize> {
    let upper_bound = |cut: usize| positions.partition_point(|p| *p <= cut);
    let len = positions.len();
    let mut picks: Vec<usize> = Vec::new();
    let mut lower = 0;
    let mut middle = cuts.get(1).map_or(len, |cut| upper_bound(*cut));
    for s in 2..cuts.len() {
        let upper = if s + 1 == cuts.len() {
            len
        } else {
            cuts.get(s).map_or(len, |cut| upper_bound(*cut))
        };
        if let Some(pick) = cheapest_index(stations, lower, upper)
            && picks.last() != Some(&pick)
        {
            picks.push(pick);
        }
        if upper >= len {
            break;
        }
        lower = middle;
        middle = upper;
    }
    picks
}

/// Index of the cheapest station in `stations[lower..upper]`, first on ties.
fn cheapest_index(stations: &[Station], lower: usize, upper: usize) -> Option<usize> {
    let window = stations.get(lower..upper)?;
    let mut best: Option<(usize, f64)> = None;
    for (offset, station) in window.iter().enumerate() {
        if best.is_none_or(|(_, price)| station.price < price) {
            best = Some((lower + offset, station.price));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Drop interior repeats of an earlier identifier or of the final one.
///
/// The first and last entries are always kept.
fn dedupe_by_id(candidates: Vec<Station>) -> Vec<Station> {
    let Some(last_id) = candidates.last().map(|s| s.id) else {
        return candidates;
    };
    let count = candidates.len();
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .enumerate()
        .filter(|(idx, station)| {
            if *idx == 0 || *idx + 1 == count {
                seen.insert(station.id);
                return true;
            }
            station.id != last_id && seen.insert(station.id)
        })
        .map(|(_, station)| station)
        .collect()
}

//! Tunables for [`LpPlanner`](crate::LpPlanner).

use std::time::Duration;

use roadfuel_core::PriceRange;

use crate::MAX_INTERIOR_CANDIDATES;

/// Configuration for [`LpPlanner`](crate::LpPlanner).
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Price band passed to the station store.
    pub price_range: PriceRange,
    /// Stations cheaper than this are treated as bad data and skipped.
    pub min_plausible_price: f64,
    /// Multiplier on `search_distance` when looking for a station near the departure.
    pub departure_search_factor: f64,
    /// Multiplier on `search_distance` when looking for a station near the arrival.
    pub arrival_search_factor: f64,
    /// Largest candidate list the exhaustive sweep will accept.
    ///
    /// Defaults to the most the stop enumerator can index; bound long sweeps
    /// with `sweep_time_limit` or a cancellation token instead.
    pub max_candidates: usize,
    /// Wall-clock budget for the combination sweep.
    pub sweep_time_limit: Option<Duration>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            price_range: PriceRange::default(),
            min_plausible_price: 0.4,
            departure_search_factor: 2.0,
            arrival_search_factor: 2.0,
            max_candidates: MAX_INTERIOR_CANDIDATES + 2,
            sweep_time_limit: None,
        }
    }
}

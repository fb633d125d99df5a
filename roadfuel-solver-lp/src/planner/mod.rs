//! `LpPlanner`: candidate reduction followed by an exhaustive LP sweep.
//!
//! Planning runs in stages. The path is fetched and reduced to a candidate
//! list, distances between candidates are fetched once, and every stop set
//! is then priced by [`plan_fueling`]. The cheapest feasible stop set wins.

use std::time::Instant;

use roadfuel_core::{
    CancellationToken, Diagnostics, DistanceMatrix, DistanceProvider, NoopObserver, PathProvider,
    PlanError, PlanObserver, PlanResponse, Planner, Route, Station, StationId, StationMarker,
    StationStore, Stop, TripRequest, ensure_square,
};

use crate::{
    CandidateSelector, FuelingError, MAX_INTERIOR_CANDIDATES, PlannerConfig, RouteSelector,
    StopCombinations, naive_cost, plan_fueling,
};

/// Refuelling planner backed by a linear-programming solver.
///
/// The planner is generic over its collaborators: a path provider, a station
/// store and a distance provider. It holds no state between calls.
pub struct LpPlanner<P, S, D>
where
    P: PathProvider,
    S: StationStore,
    D: DistanceProvider,
{
    path_provider: P,
    store: S,
    distances: D,
    config: PlannerConfig,
}

impl<P, S, D> LpPlanner<P, S, D>
where
    P: PathProvider,
    S: StationStore,
    D: DistanceProvider,
{
    /// Construct a planner using default configuration.
    #[must_use]
    pub fn new(path_provider: P, store: S, distances: D) -> Self {
        Self::with_config(path_provider, store, distances, PlannerConfig::default())
    }

    /// Construct a planner with explicit configuration.
    #[must_use]
    pub const fn with_config(
        path_provider: P,
        store: S,
        distances: D,
        config: PlannerConfig,
    ) -> Self {
        Self {
            path_provider,
            store,
            distances,
            config,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a trip, reporting progress to `observer` and honouring `cancel`.
    ///
    /// # Errors
    /// Returns a [`PlanError`] naming the stage that failed. No partial route
    /// is produced.
    pub fn solve_with(
        &self,
        request: &TripRequest,
        observer: &dyn PlanObserver,
        cancel: &CancellationToken,
    ) -> Result<PlanResponse, PlanError> {
        request.validate()?;
        let started_at = Instant::now();
        log::info!(
            "planning trip from {:?} to {:?}",
            request.departure,
            request.arrival
        );

        let path = self.path_provider.path(request.departure, request.arrival)?;
        log::debug!(
            "path has {} points over {:.1} km",
            path.len(),
            path.total_length()
        );
        observer.on_path(&path);

        let candidates = CandidateSelector::new(&self.store, &self.config).select(&path, request)?;
        if candidates.len() > self.config.max_candidates {
            return Err(PlanError::TooManyCandidates {
                found: candidates.len(),
                limit: self.config.max_candidates,
            });
        }
        observer.on_candidates(&candidates);

        let ids: Vec<StationId> = candidates.iter().map(|s| s.id).collect();
        let matrix = self.distances.distance_matrix(&ids)?;
        ensure_square(&matrix, ids.len())?;
        log::debug!("fetched a {0}x{0} distance matrix", ids.len());

        let prices: Vec<f64> = candidates.iter().map(|s| s.price).collect();
        let all_stops: Vec<usize> = (0..candidates.len()).collect();
        let baseline_cost =
            hops_between(&matrix, &all_stops).and_then(|hops| naive_cost(request, &prices, &hops));

        let sweep = Sweep {
            request,
            candidates: &candidates,
            prices: &prices,
            matrix: &matrix,
            cancel,
            deadline: self
                .config
                .sweep_time_limit
                .and_then(|limit| started_at.checked_add(limit)),
        };
        let outcome = sweep.run()?;
        let feasible = outcome.selector.feasible();
        log::info!(
            "{} of {} stop sets were feasible",
            feasible,
            outcome.evaluated
        );
        let route = outcome
            .selector
            .into_best()
            .ok_or(PlanError::NoFeasibleRoute)?;
        match baseline_cost {
            Some(baseline) => log::info!(
                "optimal cost {:.2}, filling when forced costs {:.2}",
                route.cost(),
                baseline
            ),
            None => log::info!("optimal cost {:.2}", route.cost()),
        }

        let markers = station_markers(&candidates, &route);
        observer.on_route(&route, &markers);

        Ok(PlanResponse {
            route,
            diagnostics: Diagnostics {
                solve_time: started_at.elapsed(),
                candidates: candidates.len(),
                combinations_evaluated: outcome.evaluated,
                feasible_combinations: feasible,
                baseline_cost,
            },
        })
    }
}

impl<P, S, D> Planner for LpPlanner<P, S, D>
where
    P: PathProvider + Send + Sync,
    S: StationStore + Send + Sync,
    D: DistanceProvider + Send + Sync,
{
    fn solve(&self, request: &TripRequest) -> Result<PlanResponse, PlanError> {
        self.solve_with(request, &NoopObserver, &CancellationToken::new())
    }
}

/// Inputs shared by every stop set of one planning run.
struct Sweep<'a> {
    request: &'a TripRequest,
    candidates: &'a [Station],
    prices: &'a [f64],
    matrix: &'a DistanceMatrix,
    cancel: &'a CancellationToken,
    deadline: Option<Instant>,
}

struct SweepOutcome {
    selector: RouteSelector,
    evaluated: u64,
}

impl Sweep<'_> {
    fn run(&self) -> Result<SweepOutcome, PlanError> {
        let found = self.candidates.len();
        let combinations = StopCombinations::new(found).ok_or(PlanError::TooManyCandidates {
            found,
            limit: MAX_INTERIOR_CANDIDATES + 2,
        })?;
        log::debug!(
            "sweeping {} stop sets over {found} candidates",
            combinations.total()
        );

        let mut selector = RouteSelector::default();
        let mut evaluated = 0_u64;
        for stops in combinations {
            if self.cancel.is_cancelled() {
                log::warn!("planning cancelled after {evaluated} stop sets");
                return Err(PlanError::Cancelled { evaluated });
            }
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                log::warn!("planning ran out of time after {evaluated} stop sets");
                return Err(PlanError::DeadlineExceeded { evaluated });
            }
            evaluated += 1;
            if let Some(route) = self.price(&stops) {
                selector.offer(route);
            }
        }
        Ok(SweepOutcome {
            selector,
            evaluated,
        })
    }

    /// Cheapest route through `stops`, if one exists.
    fn price(&self, stops: &[usize]) -> Option<Route> {
        let Some(hops) = hops_between(self.matrix, stops) else {
            log::warn!("distance matrix has no entry for stop set {stops:?}");
            return None;
        };
        let prices: Vec<f64> = stops
            .iter()
            .filter_map(|idx| self.prices.get(*idx).copied())
            .collect();
        let plan = match plan_fueling(self.request, &prices, &hops) {
            Ok(plan) => plan,
            Err(FuelingError::Infeasible) => return None,
            Err(err) => {
                log::warn!("stop set {stops:?} could not be priced: {err}");
                return None;
            }
        };
        let route_stops = stops
            .iter()
            .zip(&prices)
            .zip(plan.fuel.iter().zip(&plan.tank_before))
            .filter_map(|((idx, price), (fuel, tank_before))| {
                self.candidates
                    .get(*idx)
                    .map(|station| Stop::new(station.id, *price, *fuel, *tank_before))
            })
            .collect();
        Some(Route::new(route_stops))
    }
}

/// Distances between consecutive entries of `stops`.
fn hops_between(matrix: &DistanceMatrix, stops: &[usize]) -> Option<Vec<f64>> {
    stops
        .windows(2)
        .map(|pair| match pair {
            [from, to] => matrix.get(*from).and_then(|row| row.get(*to)).copied(),
            _ => None,
        })
        .collect()
}

fn station_markers(candidates: &[Station], route: &Route) -> Vec<StationMarker> {
    let stops: Vec<StationId> = route.station_ids().collect();
    candidates
        .iter()
        .map(|station| StationMarker {
            station: station.clone(),
            is_stop: stops.contains(&station.id),
        })
        .collect()
}

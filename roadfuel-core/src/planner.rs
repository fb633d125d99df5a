//! The planning boundary: requests in, routes or failures out.
//!
//! [`Planner`] is the single entry point consumed by user interfaces. Progress
//! notifications are delivered through the advisory [`PlanObserver`] trait and
//! long sweeps can be interrupted with a [`CancellationToken`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;

use crate::{
    DistanceError, PathError, Route, Station, StationStoreError, TripPath, TripRequest,
    TripRequestValidationError,
};

/// Station lookups performed while building the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStage {
    /// Stations inside the expanded bounding box of the path.
    AlongPath,
    /// Stations close to the departure point.
    NearDeparture,
    /// Stations close to the arrival point.
    NearArrival,
}

impl fmt::Display for StoreStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AlongPath => "stations along the path",
            Self::NearDeparture => "stations near the departure",
            Self::NearArrival => "stations near the arrival",
        })
    }
}

/// Errors returned by [`Planner::solve`].
///
/// Every variant is terminal for the call; no partial route is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// A request parameter was out of range.
    #[error("invalid trip request: {0}")]
    InvalidRequest(#[from] TripRequestValidationError),
    /// The path provider failed.
    #[error("could not compute the driving path: {0}")]
    Path(#[from] PathError),
    /// The station store failed.
    #[error("could not fetch {stage}: {source}")]
    StationStore {
        /// Which lookup failed.
        stage: StoreStage,
        /// Underlying store failure.
        #[source]
        source: StationStoreError,
    },
    /// The distance provider failed.
    #[error("could not fetch distances between candidates: {0}")]
    Distances(#[from] DistanceError),
    /// The store returned nothing for the area around the path.
    #[error("no stations found around the path")]
    NoStationsFound,
    /// Stations exist in the area, but none is close enough to the path.
    #[error("no candidate stations near the path")]
    NoCandidates,
    /// The candidate list is too long to sweep exhaustively.
    #[error("{found} candidate stations exceed the limit of {limit}")]
    TooManyCandidates {
        /// Candidates after reduction.
        found: usize,
        /// Configured ceiling.
        limit: usize,
    },
    /// Every stop combination was infeasible.
    #[error("no feasible route: the trip cannot be completed with the available stations")]
    NoFeasibleRoute,
    /// The caller cancelled the sweep.
    #[error("planning cancelled after {evaluated} combinations")]
    Cancelled {
        /// Combinations solved before cancellation.
        evaluated: u64,
    },
    /// The sweep ran past its time limit.
    #[error("planning exceeded its time limit after {evaluated} combinations")]
    DeadlineExceeded {
        /// Combinations solved before the deadline.
        evaluated: u64,
    },
    /// Search margins cannot be computed this close to a pole.
    #[error("latitude {latitude} is too close to a pole to search for stations")]
    UnsupportedLatitude {
        /// Latitude where the margin was undefined.
        latitude: f64,
    },
}

/// Measurements collected while planning.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Wall-clock time spent in `solve`.
    pub solve_time: Duration,
    /// Stations in the reduced candidate list.
    pub candidates: usize,
    /// Stop combinations priced by the solver.
    pub combinations_evaluated: u64,
    /// Combinations with a feasible purchase schedule.
    pub feasible_combinations: u64,
    /// Cost of filling up only when forced to, if that strategy completes the trip.
    pub baseline_cost: Option<f64>,
}

/// Successful outcome of [`Planner::solve`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanResponse {
    /// The cheapest feasible route.
    pub route: Route,
    /// How the route was found.
    pub diagnostics: Diagnostics,
}

/// Compute the cheapest refuelling plan for a trip.
///
/// Implementations must be `Send + Sync` and deterministic: identical
/// requests against identical collaborator data return identical routes.
///
/// # Examples
/// ```
/// use roadfuel_core::{PlanError, PlanResponse, Planner, TripRequest};
///
/// struct NeverFeasible;
///
/// impl Planner for NeverFeasible {
///     fn solve(&self, request: &TripRequest) -> Result<PlanResponse, PlanError> {
///         request.validate()?;
///         Err(PlanError::NoFeasibleRoute)
///     }
/// }
/// ```
pub trait Planner: Send + Sync {
    /// Plan a single trip.
    fn solve(&self, request: &TripRequest) -> Result<PlanResponse, PlanError>;
}

/// A candidate station annotated for display.
#[derive(Debug, Clone, PartialEq)]
pub struct StationMarker {
    /// The candidate station.
    pub station: Station,
    /// Whether the chosen route stops here.
    pub is_stop: bool,
}

/// Advisory progress notifications.
///
/// Callbacks run synchronously on the planning thread and cannot influence
/// the result.
pub trait PlanObserver {
    /// The driving path has been computed.
    fn on_path(&self, _path: &TripPath) {}

    /// The candidate list has been reduced.
    fn on_candidates(&self, _candidates: &[Station]) {}

    /// The optimal route has been selected.
    fn on_route(&self, _route: &Route, _markers: &[StationMarker]) {}
}

/// [`PlanObserver`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PlanObserver for NoopObserver {}

/// Cooperative cancellation flag shared between a caller and a planner.
///
/// # Examples
/// ```
/// use roadfuel_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Default, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

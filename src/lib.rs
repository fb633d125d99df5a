//! Facade crate for the roadfuel trip planner.
//!
//! This crate re-exports the core domain types and, behind the `solver-lp`
//! feature, the linear-programming planner.

#![forbid(unsafe_code)]

pub use roadfuel_core::{
    CachedDistanceProvider, CancellationToken, Diagnostics, DistanceCache, DistanceError,
    DistanceMatrix, DistanceProvider, DistanceSource, HaversineDistanceSource,
    MemoryDistanceCache, MemoryStationStore, NoopObserver, PathError, PathProvider, PlanError,
    PlanObserver, PlanResponse, Planner, PriceRange, Route, Station, StationId, StationMarker,
    StationStore, StationStoreError, Stop, StraightLinePathProvider, TripPath, TripRequest,
    TripRequestValidationError,
};

#[cfg(feature = "solver-lp")]
pub use roadfuel_solver_lp::{LpPlanner, PlannerConfig};

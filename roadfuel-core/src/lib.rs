//! Core domain types for the roadfuel trip planner.
//!
//! The crate defines what a trip, a station and a refuelling route are, the
//! geodesic helpers used to reason about them, and the collaborator traits a
//! planner depends on: [`PathProvider`], [`StationStore`] and
//! [`DistanceProvider`]. Lightweight implementations of each are included so
//! the planner can run without external services.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod distance;
pub mod geodesy;
pub mod path;
pub mod planner;
pub mod route;
pub mod station;
pub mod store;
pub mod trip;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use distance::{
    CachedDistanceProvider, DistanceCache, DistanceError, DistanceMatrix, DistanceProvider,
    DistanceSource, HaversineDistanceSource, MemoryDistanceCache, StationPair, ensure_square,
};
pub use path::{DEFAULT_RESOLUTION_KM, PathError, PathProvider, StraightLinePathProvider, TripPath};
pub use planner::{
    CancellationToken, Diagnostics, NoopObserver, PlanError, PlanObserver, PlanResponse, Planner,
    StationMarker, StoreStage,
};
pub use route::{Route, Stop};
pub use station::{PriceRange, PriceRangeError, Station, StationId};
pub use store::{MemoryStationStore, StationStore, StationStoreError};
pub use trip::{TripRequest, TripRequestValidationError};

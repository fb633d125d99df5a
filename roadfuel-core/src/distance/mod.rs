//! Driving distances between fuel stations.
//!
//! The `DistanceProvider` trait abstracts the retrieval of pairwise driving
//! distances between stations identified by [`StationId`](crate::StationId).
//! Callers supply a slice of identifiers and receive a square matrix of
//! kilometres.
//!
//! [`CachedDistanceProvider`] layers a read-through [`DistanceCache`] over a
//! [`DistanceSource`], computing only the pairs the cache is missing.

mod cache;
mod error;
mod haversine;
mod provider;

pub use cache::{CachedDistanceProvider, DistanceCache, MemoryDistanceCache, StationPair};
pub use error::DistanceError;
pub use haversine::HaversineDistanceSource;
pub use provider::{DistanceMatrix, DistanceProvider, DistanceSource, ensure_square};

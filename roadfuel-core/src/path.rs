//! Driving paths between departure and arrival.
//!
//! A [`TripPath`] is an ordered, 0-indexed polyline with its cumulative
//! arclength. [`PathProvider`] abstracts where the polyline comes from; the
//! [`StraightLinePathProvider`] is a degraded implementation that needs no
//! routing service.

use geo::{Coord, Rect};
use thiserror::Error;

use crate::geodesy::{haversine_km, haversine_to_point};

/// Default spacing between interpolated points.
pub const DEFAULT_RESOLUTION_KM: f64 = 5.0;

/// Errors from [`PathProvider::path`] and [`TripPath::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The provider produced no points.
    #[error("path must contain at least one point")]
    Empty,
    /// A point was not a finite coordinate.
    #[error("path point {index} is not a finite coordinate")]
    NonFinitePoint {
        /// Position of the offending point.
        index: usize,
    },
    /// The routing backend could not produce a path.
    #[error("routing service failed: {message}")]
    Service {
        /// Description supplied by the backend.
        message: String,
    },
}

/// Ordered polyline from departure to arrival.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadfuel_core::TripPath;
///
/// let path = TripPath::new(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 0.0, y: 1.0 },
/// ])?;
/// assert_eq!(path.len(), 2);
/// assert!(path.total_length() > 111.0);
/// # Ok::<(), roadfuel_core::PathError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TripPath {
    points: Vec<Coord<f64>>,
    arclength: Vec<f64>,
}

impl TripPath {
    /// Validate the points and compute the cumulative arclength.
    ///
    /// # Errors
    /// Returns [`PathError::Empty`] for no points and
    /// [`PathError::NonFinitePoint`] for NaN or infinite coordinates.
    pub fn new(points: Vec<Coord<f64>>) -> Result<Self, PathError> {
        if points.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(PathError::NonFinitePoint { index });
        }
        let mut arclength = Vec::with_capacity(points.len());
        let mut travelled = 0.0;
        arclength.push(travelled);
        for pair in points.windows(2) {
            if let [from, to] = pair {
                travelled += haversine_km(*from, *to);
                arclength.push(travelled);
            }
        }
        Ok(Self { points, arclength })
    }

    /// Points in travel order.
    #[must_use]
    pub fn points(&self) -> &[Coord<f64>] {
        &self.points
    }

    /// Cumulative distance from the first point to each point.
    #[must_use]
    pub fn arclength(&self) -> &[f64] {
        &self.arclength
    }

    /// Number of points.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distance along the whole path.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.arclength.last().copied().unwrap_or_default()
    }

    /// Axis-aligned bounds of the path in lon/lat space.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect<f64> {
        let first = self.points.first().copied().unwrap_or_default();
        let (min, max) = self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Coord {
                    x: lo.x.min(p.x),
                    y: lo.y.min(p.y),
                },
                Coord {
                    x: hi.x.max(p.x),
                    y: hi.y.max(p.y),
                },
            )
        });
        Rect::new(min, max)
    }

    /// Index of the path point nearest to `target`.
    ///
    /// Ties resolve to the earliest point.
    #[must_use]
    pub fn nearest_index(&self, target: Coord<f64>) -> usize {
        haversine_to_point(&self.points, target)
            .into_iter()
            .enumerate()
            .fold((0, f64::INFINITY), |(best, best_distance), (idx, d)| {
                if d < best_distance {
                    (idx, d)
                } else {
                    (best, best_distance)
                }
            })
            .0
    }
}

/// Produce the driving path between two coordinates.
///
/// Implementations must return at least one point.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadfuel_core::{PathError, PathProvider, TripPath};
///
/// struct Direct;
///
/// impl PathProvider for Direct {
///     fn path(&self, departure: Coord<f64>, arrival: Coord<f64>) -> Result<TripPath, PathError> {
///         TripPath::new(vec![departure, arrival])
///     }
/// }
///
/// let path = Direct.path(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 })?;
/// assert_eq!(path.len(), 2);
/// # Ok::<(), PathError>(())
/// ```
pub trait PathProvider {
    /// Return the path from `departure` to `arrival`.
    fn path(&self, departure: Coord<f64>, arrival: Coord<f64>) -> Result<TripPath, PathError>;
}

/// Straight-line path interpolated at a fixed resolution.
///
/// This is what trips fall back to when no routing service is configured:
/// the polyline follows the chord between departure and arrival, with
/// consecutive points at most `resolution_km` apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLinePathProvider {
    resolution_km: f64,
}

impl Default for StraightLinePathProvider {
    fn default() -> Self {
        Self {
            resolution_km: DEFAULT_RESOLUTION_KM,
        }
    }
}

impl StraightLinePathProvider {
    /// Construct a provider with a custom resolution.
    ///
    /// Non-positive or non-finite resolutions fall back to
    /// [`DEFAULT_RESOLUTION_KM`].
    #[must_use]
    pub fn with_resolution(resolution_km: f64) -> Self {
        if resolution_km.is_finite() && resolution_km > 0.0 {
            Self { resolution_km }
        } else {
            Self::default()
        }
    }

    /// Maximum spacing between consecutive points.
    #[must_use]
    pub const fn resolution_km(&self) -> f64 {
        self.resolution_km
    }
}

impl PathProvider for StraightLinePathProvider {
    fn path(&self, departure: Coord<f64>, arrival: Coord<f64>) -> Result<TripPath, PathError> {
        let distance = haversine_km(departure, arrival);
        let steps = 1 + (distance / self.resolution_km).ceil() as usize;
        let mut points = Vec::with_capacity(steps + 1);
        for k in 0..steps {
            let rho = k as f64 / steps as f64;
            points.push(Coord {
                x: departure.x * (1.0 - rho) + arrival.x * rho,
                y: departure.y * (1.0 - rho) + arrival.y * rho,
            });
        }
        points.push(arrival);
        TripPath::new(points)
    }
}

//! Fuel stations and price bands.

use geo::Coord;
use thiserror::Error;

/// Stable identifier of a fuel station.
pub type StationId = u64;

/// A fuel station with its advertised price.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadfuel_core::Station;
///
/// let station = Station::new(7, 0.72, Coord { x: 9.19, y: 45.46 });
/// assert_eq!(station.id, 7);
/// assert!(station.address.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    /// Unique identifier.
    pub id: StationId,
    /// Price per unit of fuel.
    pub price: f64,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Optional postal address for display.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address: Option<String>,
}

impl Station {
    /// Construct a station without an address.
    #[must_use]
    pub const fn new(id: StationId, price: f64, location: Coord<f64>) -> Self {
        Self {
            id,
            price,
            location,
            address: None,
        }
    }

    /// Attach a postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Inclusive band of acceptable prices.
///
/// # Examples
/// ```
/// use roadfuel_core::PriceRange;
///
/// let range = PriceRange::new(0.1, 2.0).unwrap();
/// assert!(range.contains(1.5));
/// assert!(!range.contains(2.5));
/// assert!(PriceRange::new(2.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceRange {
    min: f64,
    max: f64,
}

/// Errors returned by [`PriceRange::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PriceRangeError {
    /// The lower bound was negative or not finite.
    #[error("minimum price {min} must be a finite, non-negative number")]
    InvalidMinimum {
        /// Rejected lower bound.
        min: f64,
    },
    /// The bounds were inverted.
    #[error("minimum price {min} exceeds maximum price {max}")]
    Inverted {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
}

impl PriceRange {
    /// Validate and construct a price band.
    ///
    /// # Errors
    /// Returns [`PriceRangeError`] when `min` is negative or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self, PriceRangeError> {
        if !min.is_finite() || min < 0.0 {
            return Err(PriceRangeError::InvalidMinimum { min });
        }
        if min > max || max.is_nan() {
            return Err(PriceRangeError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound of the band.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the band.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Whether `price` falls inside the band, bounds included.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self { min: 0.1, max: 2.0 }
    }
}

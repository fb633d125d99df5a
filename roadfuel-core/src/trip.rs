//! Trip parameters supplied by the caller.

use geo::Coord;
use thiserror::Error;

/// Everything the planner needs to know about a single trip.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. Distances
/// are kilometres and fuel quantities use the same volume unit as station
/// prices (typically litres).
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadfuel_core::TripRequest;
///
/// let request = TripRequest {
///     departure: Coord { x: 9.19, y: 45.46 },
///     arrival: Coord { x: 12.50, y: 41.90 },
///     fuel_efficiency: 10.0,
///     tank_capacity: 40.0,
///     minimum_purchase: 10.0,
///     autonomy_margin: 50.0,
///     initial_fuel: 5.0,
///     segment_length: 100.0,
///     search_distance: 2.0,
/// };
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripRequest {
    /// Where the trip starts.
    pub departure: Coord<f64>,
    /// Where the trip ends.
    pub arrival: Coord<f64>,
    /// Distance travelled per unit of fuel.
    pub fuel_efficiency: f64,
    /// Usable tank volume.
    pub tank_capacity: f64,
    /// Minimum spend at every intermediate stop.
    pub minimum_purchase: f64,
    /// Reserve, expressed as distance, that must remain on arrival at a stop.
    pub autonomy_margin: f64,
    /// Fuel in the tank at departure.
    pub initial_fuel: f64,
    /// Length of the path windows used to reduce candidate stations.
    pub segment_length: f64,
    /// How far from the path a station may be to count as "on the way".
    pub search_distance: f64,
}

/// Detailed validation failures for [`TripRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TripRequestValidationError {
    /// A numeric parameter was NaN or infinite.
    #[error("parameter '{field}' must be a finite number")]
    NonFiniteValue {
        /// Name of the offending parameter.
        field: &'static str,
    },
    /// A coordinate was outside the WGS84 range.
    #[error("coordinate '{field}' is outside the valid latitude/longitude range")]
    InvalidCoordinate {
        /// Name of the offending coordinate.
        field: &'static str,
    },
    /// `fuel_efficiency` was zero or negative.
    #[error("parameter 'fuel_efficiency' must be positive")]
    NonPositiveFuelEfficiency,
    /// `tank_capacity` was zero or negative.
    #[error("parameter 'tank_capacity' must be positive")]
    NonPositiveTankCapacity,
    /// `minimum_purchase` was negative.
    #[error("parameter 'minimum_purchase' must be positive or zero")]
    NegativeMinimumPurchase,
    /// `autonomy_margin` was negative.
    #[error("parameter 'autonomy_margin' must be positive or zero")]
    NegativeAutonomyMargin,
    /// `initial_fuel` was negative.
    #[error("parameter 'initial_fuel' must be positive or zero")]
    NegativeInitialFuel,
    /// `segment_length` was zero or negative.
    #[error("parameter 'segment_length' must be positive")]
    NonPositiveSegmentLength,
    /// `search_distance` was zero or negative.
    #[error("parameter 'search_distance' must be positive")]
    NonPositiveSearchDistance,
}

impl TripRequest {
    /// Check every parameter, reporting the first offending field.
    ///
    /// # Errors
    /// Returns a [`TripRequestValidationError`] naming the first invalid
    /// parameter, checked in declaration order.
    pub fn validate(&self) -> Result<(), TripRequestValidationError> {
        validate_coordinate(self.departure, "departure")?;
        validate_coordinate(self.arrival, "arrival")?;
        for (field, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(TripRequestValidationError::NonFiniteValue { field });
            }
        }
        if self.fuel_efficiency <= 0.0 {
            return Err(TripRequestValidationError::NonPositiveFuelEfficiency);
        }
        if self.tank_capacity <= 0.0 {
            return Err(TripRequestValidationError::NonPositiveTankCapacity);
        }
        if self.minimum_purchase < 0.0 {
            return Err(TripRequestValidationError::NegativeMinimumPurchase);
        }
        if self.autonomy_margin < 0.0 {
            return Err(TripRequestValidationError::NegativeAutonomyMargin);
        }
        if self.initial_fuel < 0.0 {
            return Err(TripRequestValidationError::NegativeInitialFuel);
        }
        if self.segment_length <= 0.0 {
            return Err(TripRequestValidationError::NonPositiveSegmentLength);
        }
        if self.search_distance <= 0.0 {
            return Err(TripRequestValidationError::NonPositiveSearchDistance);
        }
        Ok(())
    }

    /// Fuel needed to cover `distance_km`.
    #[must_use]
    pub fn fuel_for(&self, distance_km: f64) -> f64 {
        distance_km / self.fuel_efficiency
    }

    /// Fuel equivalent of the autonomy margin.
    #[must_use]
    pub fn reserve_fuel(&self) -> f64 {
        self.fuel_for(self.autonomy_margin)
    }

    const fn numeric_fields(&self) -> [(&'static str, f64); 7] {
        [
            ("fuel_efficiency", self.fuel_efficiency),
            ("tank_capacity", self.tank_capacity),
            ("minimum_purchase", self.minimum_purchase),
            ("autonomy_margin", self.autonomy_margin),
            ("initial_fuel", self.initial_fuel),
            ("segment_length", self.segment_length),
            ("search_distance", self.search_distance),
        ]
    }
}

fn validate_coordinate(
    coord: Coord<f64>,
    field: &'static str,
) -> Result<(), TripRequestValidationError> {
    let valid = coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y);
    if valid {
        Ok(())
    } else {
        Err(TripRequestValidationError::InvalidCoordinate { field })
    }
}

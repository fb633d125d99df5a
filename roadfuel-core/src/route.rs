//! Refuelling plans.
//!
//! A [`Route`] is the priced outcome of one feasible stop set: the ordered
//! [`Stop`]s and the total spend.

use crate::StationId;

/// One refuelling stop in a [`Route`].
///
/// # Examples
/// ```
/// use roadfuel_core::Stop;
///
/// let stop = Stop::new(4, 0.8, 12.0, 6.0);
/// assert_eq!(stop.tank_after(), 18.0);
/// assert!((stop.cost() - 9.6).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    station_id: StationId,
    price: f64,
    fuel: f64,
    tank_before: f64,
    tank_after: f64,
}

impl Stop {
    /// Record a purchase of `fuel` at `price` with `tank_before` on arrival.
    #[must_use]
    pub fn new(station_id: StationId, price: f64, fuel: f64, tank_before: f64) -> Self {
        Self {
            station_id,
            price,
            fuel,
            tank_before,
            tank_after: tank_before + fuel,
        }
    }

    /// Station where the stop happens.
    #[must_use]
    pub const fn station_id(&self) -> StationId {
        self.station_id
    }

    /// Price paid per unit of fuel.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Fuel bought.
    #[must_use]
    pub const fn fuel(&self) -> f64 {
        self.fuel
    }

    /// Tank level on arrival, before buying.
    #[must_use]
    pub const fn tank_before(&self) -> f64 {
        self.tank_before
    }

    /// Tank level on leaving.
    #[must_use]
    pub const fn tank_after(&self) -> f64 {
        self.tank_after
    }

    /// Money spent at this stop.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.price * self.fuel
    }
}

/// The cheapest feasible refuelling plan found for a trip.
///
/// # Examples
/// ```
/// use roadfuel_core::{Route, Stop};
///
/// let route = Route::new(vec![Stop::new(1, 1.0, 10.0, 5.0), Stop::new(2, 0.5, 20.0, 20.0)]);
/// assert_eq!(route.stops().len(), 2);
/// assert_eq!(route.cost(), 20.0);
/// assert_eq!(route.station_ids().collect::<Vec<_>>(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    cost: f64,
    stops: Vec<Stop>,
}

impl Route {
    /// Build a route, totalling the spend of every stop.
    #[must_use]
    pub fn new(stops: Vec<Stop>) -> Self {
        let cost = stops.iter().map(Stop::cost).sum();
        Self { cost, stops }
    }

    /// Total spend across all stops.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Stops in travel order.
    #[must_use]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Station identifiers in travel order.
    pub fn station_ids(&self) -> impl Iterator<Item = StationId> + '_ {
        self.stops.iter().map(Stop::station_id)
    }
}

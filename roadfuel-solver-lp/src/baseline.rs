//! Cost of refuelling without planning.
//!
//! The baseline stops at every candidate in turn and fills the tank whenever
//! the next hop cannot be covered, then tops off at the last candidate. It is
//! reported next to the optimum so callers can show the saving.

use roadfuel_core::TripRequest;

/// Spend of the fill-when-forced strategy over all candidates.
///
/// Returns `None` when the strategy cannot finish the trip because a hop is
/// longer than a full tank.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "tank bookkeeping is floating-point"
)]
pub fn naive_cost(request: &TripRequest, prices: &[f64], hops: &[f64]) -> Option<f64> {
    let last_price = prices.last()?;
    let capacity = request.tank_capacity;
    let mut tank = request.initial_fuel;
    let mut cost = 0.0;
    for (price, hop) in prices.iter().zip(hops) {
        let needed = request.fuel_for(*hop);
        if needed > tank {
            cost += (capacity - tank) * price;
            tank = capacity;
        }
        tank -= needed;
        if tank < 0.0 {
            return None;
        }
    }
    cost += (capacity - tank) * last_price;
    Some(cost)
}

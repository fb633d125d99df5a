//! Optimal purchase schedule for a fixed sequence of stops.
//!
//! For stops `0..=n` the linear program has purchase variables `fuel_i` for
//! every stop and arrival levels `tank_i` for stops `1..=n`, with the tank at
//! stop `0` fixed to the initial fuel. It minimises `Σ price_i · fuel_i`
//! subject to:
//!
//! - hop balance: `tank_{i+1} = tank_i + fuel_i − hop_i / efficiency`;
//! - closure: `tank_n + fuel_n = capacity`;
//! - capacity: `tank_i + fuel_i ≤ capacity` for `i < n`;
//! - reserve: `tank_i ≥ margin / efficiency` for `i ≥ 1`;
//! - minimum purchase: `price_i · fuel_i ≥ minimum` for `0 < i < n`;
//! - non-negativity of every purchase.
//!
//! Every inequality is relaxed by [`SOLVER_TOLERANCE`], so a stop set that
//! misses a bound by less than that is still feasible.

use minilp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use roadfuel_core::TripRequest;
use thiserror::Error;

/// Slack granted to every inequality of the purchase schedule.
///
/// Reported values within twice this distance of zero are reported as zero.
pub const SOLVER_TOLERANCE: f64 = 1e-6;

/// Why a stop sequence has no purchase schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FuelingError {
    /// Fewer than two stops were supplied.
    #[error("not enough stops to plan fuelling")]
    NotEnoughStops,
    /// The number of hops does not match the number of stops.
    #[error("{stops} stops need {expected} hops, got {hops}")]
    DimensionMismatch {
        /// Stops supplied.
        stops: usize,
        /// Hops required.
        expected: usize,
        /// Hops supplied.
        hops: usize,
    },
    /// No schedule satisfies every constraint.
    #[error("no purchase schedule satisfies the constraints")]
    Infeasible,
    /// The objective has no lower bound.
    #[error("the purchase schedule is unbounded")]
    Unbounded,
}

/// Purchase amounts and tank levels for every stop of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelingPlan {
    /// Fuel bought at each stop.
    pub fuel: Vec<f64>,
    /// Tank level on arrival at each stop; the first entry is the initial fuel.
    pub tank_before: Vec<f64>,
    /// Total spend.
    pub cost: f64,
}

/// Solve the purchase schedule for stops priced `prices` separated by `hops`.
///
/// `hops[i]` is the driving distance from stop `i` to stop `i + 1`, so
/// `hops.len() + 1 == prices.len()`.
///
/// # Errors
/// Returns [`FuelingError::Infeasible`] when no schedule exists, which is the
/// expected outcome for many stop sets, and a structural error otherwise.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadfuel_core::TripRequest;
/// use roadfuel_solver_lp::plan_fueling;
///
/// let request = TripRequest {
///     departure: Coord { x: 0.0, y: 0.0 },
///     arrival: Coord { x: 1.0, y: 0.0 },
///     fuel_efficiency: 10.0,
///     tank_capacity: 40.0,
///     minimum_purchase: 0.0,
///     autonomy_margin: 0.0,
///     initial_fuel: 0.0,
///     segment_length: 100.0,
///     search_distance: 2.0,
/// };
/// // 100 km needs 10 units: buy only those at the dearer first stop, then fill up.
/// let plan = plan_fueling(&request, &[2.0, 1.0], &[100.0]).unwrap();
/// assert!((plan.cost - (2.0 * 10.0 + 40.0)).abs() < 1e-5);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "constraint right-hand sides are derived from trip parameters"
)]
pub fn plan_fueling(
    request: &TripRequest,
    prices: &[f64],
    hops: &[f64],
) -> Result<FuelingPlan, FuelingError> {
    let Some(n) = prices.len().checked_sub(1).filter(|n| *n >= 1) else {
        return Err(FuelingError::NotEnoughStops);
    };
    if hops.len() != n {
        return Err(FuelingError::DimensionMismatch {
            stops: prices.len(),
            expected: n,
            hops: hops.len(),
        });
    }

    let capacity = request.tank_capacity;
    let initial = request.initial_fuel;
    let floor = request.reserve_fuel() - SOLVER_TOLERANCE;
    let ceiling = capacity + SOLVER_TOLERANCE;
    let minimum = request.minimum_purchase - SOLVER_TOLERANCE;
    let hop_fuel: Vec<f64> = hops.iter().map(|d| request.fuel_for(*d)).collect();

    let mut problem = Problem::new(OptimizationDirection::Minimize);
    let fuel: Vec<Variable> = prices
        .iter()
        .map(|price| problem.add_var(*price, (0.0, f64::INFINITY)))
        .collect();
    // `tanks[k]` is the arrival level at stop `k + 1`.
    let tanks: Vec<Variable> = (0..n)
        .map(|_| problem.add_var(0.0, (floor, f64::INFINITY)))
        .collect();

    let (Some(first_fuel), Some(first_tank), Some(last_fuel), Some(last_tank)) =
        (fuel.first(), tanks.first(), fuel.last(), tanks.last())
    else {
        return Err(FuelingError::NotEnoughStops);
    };
    let first_hop = hop_fuel.first().copied().unwrap_or_default();

    problem.add_constraint(
        &[(*first_tank, 1.0), (*first_fuel, -1.0)],
        ComparisonOp::Eq,
        initial - first_hop,
    );
    problem.add_constraint(&[(*first_fuel, 1.0)], ComparisonOp::Le, ceiling - initial);

    for (k, pair) in tanks.windows(2).enumerate() {
        let stop = k + 1;
        let (Some(arrival), Some(next), Some(bought), Some(price), Some(hop)) = (
            pair.first(),
            pair.get(1),
            fuel.get(stop),
            prices.get(stop),
            hop_fuel.get(stop),
        ) else {
            continue;
        };
        problem.add_constraint(
            &[(*next, 1.0), (*arrival, -1.0), (*bought, -1.0)],
            ComparisonOp::Eq,
            -hop,
        );
        problem.add_constraint(
            &[(*arrival, 1.0), (*bought, 1.0)],
            ComparisonOp::Le,
            ceiling,
        );
        problem.add_constraint(&[(*bought, *price)], ComparisonOp::Ge, minimum);
    }

    problem.add_constraint(
        &[(*last_tank, 1.0), (*last_fuel, 1.0)],
        ComparisonOp::Eq,
        capacity,
    );

    let solution = problem.solve().map_err(|err| match err {
        minilp::Error::Unbounded => FuelingError::Unbounded,
        _ => FuelingError::Infeasible,
    })?;

    let bought: Vec<f64> = fuel.iter().map(|v| snap(solution[*v])).collect();
    let mut tank_before = Vec::with_capacity(n + 1);
    tank_before.push(initial);
    tank_before.extend(tanks.iter().map(|v| snap(solution[*v])));
    let cost = prices.iter().zip(&bought).map(|(p, f)| p * f).sum();

    Ok(FuelingPlan {
        fuel: bought,
        tank_before,
        cost,
    })
}

#[expect(clippy::float_arithmetic, reason = "the snapping band spans both relaxed bounds")]
fn snap(value: f64) -> f64 {
    if value.abs() <= 2.0 * SOLVER_TOLERANCE {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    clippy::indexing_slicing,
    reason = "tests compare solver output"
)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    const EPS: f64 = 1e-5;

    #[fixture]
    fn request() -> TripRequest {
        TripRequest {
            departure: Coord { x: 0.0, y: 0.0 },
            arrival: Coord { x: 1.0, y: 0.0 },
            fuel_efficiency: 10.0,
            tank_capacity: 40.0,
            minimum_purchase: 0.0,
            autonomy_margin: 0.0,
            initial_fuel: 0.0,
            segment_length: 100.0,
            search_distance: 2.0,
        }
    }

    #[rstest]
    #[case(&[1.0])]
    #[case(&[])]
    fn single_stop_is_rejected(request: TripRequest, #[case] prices: &[f64]) {
        assert_eq!(
            plan_fueling(&request, prices, &[]),
            Err(FuelingError::NotEnoughStops)
        );
    }

    #[rstest]
    fn hop_count_must_match(request: TripRequest) {
        assert!(matches!(
            plan_fueling(&request, &[1.0, 1.0, 1.0], &[10.0]),
            Err(FuelingError::DimensionMismatch { expected: 2, .. })
        ));
    }

    #[rstest]
    fn two_stops_buy_just_enough_then_fill(request: TripRequest) {
        let plan = plan_fueling(&request, &[1.5, 1.0], &[200.0]).expect("feasible");
        assert!((plan.fuel[0] - 20.0).abs() < EPS);
        assert!(plan.tank_before[1].abs() < EPS);
        assert!((plan.fuel[1] - 40.0).abs() < EPS);
        assert!((plan.cost - 70.0).abs() < EPS);
    }

    #[rstest]
    fn cheap_first_stop_is_exploited(request: TripRequest) {
        // The first stop is cheaper, so the tank arrives as full as possible.
        let plan = plan_fueling(&request, &[0.5, 2.0], &[100.0]).expect("feasible");
        assert!((plan.fuel[0] - 40.0).abs() < EPS);
        assert!((plan.tank_before[1] - 30.0).abs() < EPS);
        assert!((plan.fuel[1] - 10.0).abs() < EPS);
    }

    #[rstest]
    #[case::exactly_one_tank(400.0, true)]
    #[case::within_tolerance(400.000_000_1, true)]
    #[case::just_over(400.1, false)]
    #[case::far_over(450.0, false)]
    fn hop_feasibility_honours_solver_tolerance(
        request: TripRequest,
        #[case] hop: f64,
        #[case] feasible: bool,
    ) {
        let outcome = plan_fueling(&request, &[1.0, 1.0], &[hop]);
        if feasible {
            let plan = outcome.expect("hop fits the tank within tolerance");
            assert!((plan.cost - 80.0).abs() < EPS);
            assert!(plan.tank_before[1].abs() < EPS);
        } else {
            assert_eq!(outcome, Err(FuelingError::Infeasible));
        }
    }

    #[rstest]
    fn reserve_is_met_within_tolerance(mut request: TripRequest) {
        request.autonomy_margin = 100.0;
        // 300 km plus a sliver more than the reserve leaves room for.
        let plan = plan_fueling(&request, &[1.0, 1.0], &[300.000_000_5]).expect("feasible");
        assert!(plan.tank_before[1] >= request.reserve_fuel() - EPS);
    }

    #[rstest]
    fn reserve_shrinks_the_usable_tank(mut request: TripRequest) {
        request.autonomy_margin = 100.0;
        assert!(plan_fueling(&request, &[1.0, 1.0], &[300.0]).is_ok());
        assert_eq!(
            plan_fueling(&request, &[1.0, 1.0], &[350.0]),
            Err(FuelingError::Infeasible)
        );
    }

    #[rstest]
    fn initial_fuel_counts_towards_the_first_hop(mut request: TripRequest) {
        request.initial_fuel = 25.0;
        let plan = plan_fueling(&request, &[1.0, 0.8], &[200.0]).expect("feasible");
        assert!(plan.fuel[0].abs() < EPS);
        assert!((plan.tank_before[1] - 5.0).abs() < EPS);
        assert!((plan.fuel[1] - 35.0).abs() < EPS);
    }

    #[rstest]
    fn interior_stop_meets_minimum_purchase(mut request: TripRequest) {
        // The interior stop is dear, yet it must sell at least 12 currency units.
        request.minimum_purchase = 12.0;
        let prices = [1.0, 3.0, 1.0];
        let plan = plan_fueling(&request, &prices, &[100.0, 100.0]).expect("feasible");
        assert!(prices[1] * plan.fuel[1] >= request.minimum_purchase - EPS);
        assert!((plan.fuel[1] - 4.0).abs() < EPS);
    }

    #[rstest]
    fn endpoints_are_exempt_from_minimum_purchase(mut request: TripRequest) {
        request.minimum_purchase = 100.0;
        request.initial_fuel = 30.0;
        let plan = plan_fueling(&request, &[1.0, 0.9], &[100.0]).expect("feasible");
        assert!(plan.fuel[0].abs() < EPS);
        assert!(0.9 * plan.fuel[1] < request.minimum_purchase);
    }

    #[rstest]
    fn unreachable_minimum_purchase_is_infeasible(mut request: TripRequest) {
        // Selling 200 currency units at price 1 needs 200 units of fuel.
        request.minimum_purchase = 200.0;
        assert_eq!(
            plan_fueling(&request, &[1.0, 1.0, 1.0], &[100.0, 100.0]),
            Err(FuelingError::Infeasible)
        );
    }

    #[rstest]
    fn overfull_initial_tank_is_infeasible(mut request: TripRequest) {
        request.initial_fuel = 50.0;
        assert_eq!(
            plan_fueling(&request, &[1.0, 1.0], &[10.0]),
            Err(FuelingError::Infeasible)
        );
    }
}

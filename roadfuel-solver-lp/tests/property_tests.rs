//! Property-based tests for the LP planner.
//!
//! These tests use `proptest` to assert invariants that must hold for every
//! feasible purchase schedule, and compare the planner against an independent
//! brute force on small instances.
//!
//! # Invariants tested
//!
//! - **Mass balance:** each arrival level is the previous level plus the
//!   purchase minus the hop's fuel.
//! - **Capacity:** no stop but the last leaves with more than a full tank.
//! - **Closure:** the last stop leaves with exactly a full tank.
//! - **Reserve:** every arrival after the first keeps the autonomy reserve.
//! - **Minimum purchase:** interior stops sell at least the minimum.
//! - **Optimality:** the planner matches the cheapest stop set found by
//!   pricing every subset of its candidates independently.
//! - **Determinism:** repeated solves return identical routes.


use std::collections::HashSet;

use proptest::prelude::*;
use roadfuel_core::test_support::RecordingObserver;
use roadfuel_core::{CancellationToken, PlanError, Planner};
use roadfuel_solver_lp::{StopCombinations, plan_fueling};

use proptest_support::{
    TOLERANCE, assert_plan_invariants, brute_force_cost, instance_strategy, station_index,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every feasible schedule satisfies every constraint.
    #[test]
    fn feasible_schedules_respect_every_constraint(instance in instance_strategy(2, 6)) {
        let offsets = instance.offsets();
        let combinations = StopCombinations::new(instance.prices.len())
            .expect("small candidate list");
        for stops in combinations {
            let prices: Vec<f64> = stops
                .iter()
                .filter_map(|i| instance.prices.get(*i).copied())
                .collect();
            let hops: Vec<f64> = stops
                .windows(2)
                .filter_map(|pair| match pair {
                    [from, to] => Some((offsets.get(*to)? - offsets.get(*from)?).abs()),
                    _ => None,
                })
                .collect();
            if let Ok(plan) = plan_fueling(&instance.request, &prices, &hops) {
                assert_plan_invariants(&instance.request, &prices, &hops, &plan);
            }
        }
    }

    /// Property: the planner's route is as cheap as the best stop set over
    /// the candidates it selected, and exists exactly when one does.
    #[test]
    fn planner_matches_brute_force(instance in instance_strategy(2, 5)) {
        let observer = RecordingObserver::default();
        let outcome = instance
            .planner()
            .solve_with(&instance.trip(), &observer, &CancellationToken::new());

        let index = station_index(&instance);
        let (prices, offsets): (Vec<f64>, Vec<f64>) = observer
            .candidates
            .borrow()
            .iter()
            .filter_map(|id| index.get(id).copied())
            .unzip();
        let expected = brute_force_cost(&instance.trip(), &prices, &offsets);

        match (outcome, expected) {
            (Ok(response), Some(cost)) => {
                prop_assert!((response.route.cost() - cost).abs() < TOLERANCE);
            }
            (Err(PlanError::NoFeasibleRoute), None) => {}
            (outcome, expected) => {
                prop_assert!(false, "planner returned {outcome:?}, brute force {expected:?}");
            }
        }
    }

    /// Property: identical inputs give identical routes.
    #[test]
    fn solving_is_deterministic(instance in instance_strategy(2, 5)) {
        let planner = instance.planner();
        let request = instance.trip();
        let first = planner.solve(&request).map(|response| response.route);
        let second = planner.solve(&request).map(|response| response.route);
        prop_assert_eq!(first, second);
    }

    /// Property: stop sets are distinct and there are `2^(m-2)` of them.
    #[test]
    fn stop_sets_are_distinct(candidates in 2_usize..12) {
        let combinations = StopCombinations::new(candidates).expect("small candidate list");
        let total = combinations.total();
        let distinct: HashSet<Vec<usize>> = combinations.collect();
        prop_assert_eq!(u64::try_from(distinct.len()).ok(), Some(total));
        prop_assert_eq!(Some(total), 1_u64.checked_shl(u32::try_from(candidates - 2).unwrap_or(0)));
    }
}

//! Behavioural tests for `LpPlanner` using rstest-bdd.

use std::cell::RefCell;

use geo::Coord;
use roadfuel_core::test_support::{FixedDistanceProvider, station};
use roadfuel_core::{
    MemoryStationStore, PlanError, PlanResponse, Planner, Station, StationId,
    StraightLinePathProvider, TripRequest,
};
use roadfuel_solver_lp::LpPlanner;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const EPS: f64 = 1e-5;

#[derive(Debug)]
struct PlannerWorld {
    request: RefCell<TripRequest>,
    stations: RefCell<Vec<Station>>,
    road_km: RefCell<Vec<f64>>,
    outcome: RefCell<Option<Result<PlanResponse, PlanError>>>,
}

impl PlannerWorld {
    fn new() -> Self {
        Self {
            request: RefCell::new(TripRequest {
                departure: Coord { x: 0.0, y: 0.0 },
                arrival: Coord { x: 1.0, y: 0.0 },
                fuel_efficiency: 10.0,
                tank_capacity: 40.0,
                minimum_purchase: 0.0,
                autonomy_margin: 0.0,
                initial_fuel: 0.0,
                segment_length: 100.0,
                search_distance: 5.0,
            }),
            stations: RefCell::new(Vec::new()),
            road_km: RefCell::new(Vec::new()),
            outcome: RefCell::new(None),
        }
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_outcome(&self) -> Result<PlanResponse, PlanError> {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_route(&self) -> PlanResponse {
        self.expect_outcome().expect("expected a route")
    }

    fn stop_ids(&self) -> Vec<StationId> {
        self.expect_route().route.station_ids().collect()
    }
}

#[fixture]
fn world() -> PlannerWorld {
    PlannerWorld::new()
}

#[given("a trip across one degree of the equator")]
fn given_trip(world: &PlannerWorld) {
    // The fixture already describes this trip.
    let _ = world;
}

#[given("stations at the departure and the arrival")]
fn given_endpoint_stations(world: &PlannerWorld) {
    world.stations.replace(vec![
        station(1, 1.0, 0.001, 0.0),
        station(2, 1.5, 0.999, 0.0),
    ]);
    world.road_km.replace(vec![0.0, 110.0]);
}

#[given("the stations are 110 km apart by road")]
fn given_short_hop(world: &PlannerWorld) {
    world.road_km.replace(vec![0.0, 110.0]);
}

#[given("the stations are 500 km apart by road")]
fn given_long_hop(world: &PlannerWorld) {
    world.road_km.replace(vec![0.0, 500.0]);
}

#[given("a cheap station halfway")]
fn given_halfway_station(world: &PlannerWorld) {
    world.stations.borrow_mut().push(station(3, 0.9, 0.5, 0.0));
    world.road_km.borrow_mut().push(55.0);
}

#[given("a minimum purchase of 100 per stop")]
fn given_minimum_purchase(world: &PlannerWorld) {
    world.request.borrow_mut().minimum_purchase = 100.0;
}

#[given("no stations anywhere")]
fn given_no_stations(world: &PlannerWorld) {
    world.stations.replace(Vec::new());
    world.road_km.replace(Vec::new());
}

#[when("the planner runs")]
fn when_planner_runs(world: &PlannerWorld) {
    let stations = world.stations.borrow().clone();
    let ids: Vec<StationId> = stations.iter().map(|s| s.id).collect();
    let distances = FixedDistanceProvider::on_a_line(ids, &world.road_km.borrow());
    let planner = LpPlanner::new(
        StraightLinePathProvider::default(),
        MemoryStationStore::with_stations(stations),
        distances,
    );
    let request = *world.request.borrow();
    world.outcome.replace(Some(planner.solve(&request)));
}

#[then("the route stops at stations 1 and 2")]
fn then_direct_route(world: &PlannerWorld) {
    assert_eq!(world.stop_ids(), vec![1, 2]);
}

#[then("the route stops at stations 1, 3 and 2")]
fn then_route_via_halfway(world: &PlannerWorld) {
    assert_eq!(world.stop_ids(), vec![1, 3, 2]);
}

#[then("the route leaves its last stop with a full tank")]
#[expect(
    clippy::float_arithmetic,
    reason = "tank levels are compared within a tolerance"
)]
fn then_full_tank(world: &PlannerWorld) {
    let response = world.expect_route();
    let capacity = world.request.borrow().tank_capacity;
    let last = response.route.stops().last().map(|stop| stop.tank_after());
    assert!(last.is_some_and(|tank| (tank - capacity).abs() < EPS));
}

#[then("the route costs 56.5")]
#[expect(
    clippy::float_arithmetic,
    reason = "costs are compared within a tolerance"
)]
fn then_cost(world: &PlannerWorld) {
    assert!((world.expect_route().route.cost() - 56.5).abs() < EPS);
}

#[then("every interior stop meets the minimum purchase")]
#[expect(
    clippy::float_arithmetic,
    reason = "spend is compared within a tolerance"
)]
fn then_minimum_purchase(world: &PlannerWorld) {
    let response = world.expect_route();
    let minimum = world.request.borrow().minimum_purchase;
    let stops = response.route.stops();
    let interior = stops
        .get(1..stops.len().saturating_sub(1))
        .unwrap_or_default();
    assert!(interior.iter().all(|stop| stop.cost() >= minimum - EPS));
}

#[then("the planner reports no feasible route")]
fn then_no_feasible_route(world: &PlannerWorld) {
    assert_eq!(world.expect_outcome(), Err(PlanError::NoFeasibleRoute));
}

#[then("the planner reports that no stations were found")]
fn then_no_stations(world: &PlannerWorld) {
    assert_eq!(world.expect_outcome(), Err(PlanError::NoStationsFound));
}

#[scenario(path = "tests/features/lp_planner.feature", index = 0)]
fn short_trip(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lp_planner.feature", index = 1)]
fn infeasible_trip(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lp_planner.feature", index = 2)]
fn halfway_station(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lp_planner.feature", index = 3)]
fn minimum_purchase_exemption(world: PlannerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/lp_planner.feature", index = 4)]
fn no_stations(world: PlannerWorld) {
    let _ = world;
}

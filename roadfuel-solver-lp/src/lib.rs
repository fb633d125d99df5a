//! Linear-programming refuelling planner for roadfuel.
//!
//! This crate provides [`LpPlanner`], the default implementation of the
//! [`Planner`](roadfuel_core::Planner) trait. Stations around the driving path
//! are reduced by a [`CandidateSelector`] to a short list ordered along the
//! trip. Every subset of interior candidates, enumerated by
//! [`StopCombinations`], is then priced as a small linear program by
//! [`plan_fueling`], and the [`RouteSelector`] keeps the cheapest feasible
//! result.
//!
//! The sweep is exhaustive and therefore exponential in the number of
//! candidates. [`PlannerConfig::max_candidates`] caps the list at what the
//! stop enumerator can index; the sweep itself is bounded by a
//! [`CancellationToken`](roadfuel_core::CancellationToken) and an optional
//! time limit.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod baseline;
mod candidates;
mod combinations;
mod config;
mod fueling;
mod planner;
mod selection;

pub use baseline::naive_cost;
pub use candidates::CandidateSelector;
pub use combinations::{MAX_INTERIOR_CANDIDATES, StopCombinations};
pub use config::PlannerConfig;
pub use fueling::{FuelingError, FuelingPlan, SOLVER_TOLERANCE, plan_fueling};
pub use planner::LpPlanner;
pub use selection::RouteSelector;

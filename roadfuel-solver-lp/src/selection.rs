//! Choosing the cheapest feasible route.

use roadfuel_core::Route;

/// Keeps the cheapest route offered so far.
///
/// Ties keep the route offered first, which matches a stable ascending sort
/// of all feasible routes in enumeration order.
///
/// # Examples
/// ```
/// use roadfuel_core::{Route, Stop};
/// use roadfuel_solver_lp::RouteSelector;
///
/// let mut selector = RouteSelector::default();
/// selector.offer(Route::new(vec![Stop::new(1, 2.0, 10.0, 0.0)]));
/// selector.offer(Route::new(vec![Stop::new(2, 1.0, 10.0, 0.0)]));
/// assert_eq!(selector.feasible(), 2);
/// let best = selector.into_best().unwrap();
/// assert_eq!(best.station_ids().collect::<Vec<_>>(), vec![2]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RouteSelector {
    best: Option<Route>,
    feasible: u64,
}

impl RouteSelector {
    /// Consider a feasible route.
    pub fn offer(&mut self, route: Route) {
        self.feasible += 1;
        let cheaper = self
            .best
            .as_ref()
            .is_none_or(|best| route.cost().total_cmp(&best.cost()).is_lt());
        if cheaper {
            self.best = Some(route);
        }
    }

    /// Number of routes offered.
    #[must_use]
    pub const fn feasible(&self) -> u64 {
        self.feasible
    }

    /// The cheapest route, if any was offered.
    #[must_use]
    pub fn into_best(self) -> Option<Route> {
        self.best
    }
}

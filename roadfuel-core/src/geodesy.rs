//! Great-circle helpers for WGS84 coordinates.
//!
//! Coordinates follow the `geo` convention used throughout the crate:
//! `x = longitude` and `y = latitude`, both in degrees. Distances are in
//! kilometres on a sphere of radius [`EARTH_RADIUS_KM`].

use geo::Coord;

/// Mean Earth radius used by every conversion in this module.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Cosines below this value are treated as polar and rejected.
const MIN_COS_LATITUDE: f64 = 1e-9;

/// Convert a distance into the matching change in latitude.
///
/// # Examples
/// ```
/// use roadfuel_core::geodesy::latitude_margin;
///
/// let degrees = latitude_margin(111.194_926_644_558_73);
/// assert!((degrees - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn latitude_margin(distance_km: f64) -> f64 {
    (distance_km / EARTH_RADIUS_KM).to_degrees()
}

/// Convert a distance into the matching change in longitude at `latitude`.
///
/// Meridians converge towards the poles, so the same distance spans more
/// degrees of longitude at higher latitudes. Returns `None` when the
/// conversion is undefined: at the poles, or when the distance wraps more
/// than the whole parallel.
///
/// # Examples
/// ```
/// use roadfuel_core::geodesy::{latitude_margin, longitude_margin};
///
/// let equator = longitude_margin(10.0, 0.0).unwrap();
/// assert!((equator - latitude_margin(10.0)).abs() < 1e-9);
/// assert!(longitude_margin(10.0, 60.0).unwrap() > equator);
/// assert!(longitude_margin(10.0, 90.0).is_none());
/// ```
#[must_use]
pub fn longitude_margin(distance_km: f64, latitude: f64) -> Option<f64> {
    let cos_latitude = latitude.to_radians().cos();
    if cos_latitude.abs() < MIN_COS_LATITUDE {
        return None;
    }
    let ratio = (distance_km / (2.0 * EARTH_RADIUS_KM)).sin() / cos_latitude;
    if !(-1.0..=1.0).contains(&ratio) {
        return None;
    }
    Some(2.0 * ratio.asin().to_degrees())
}

/// Great-circle distance between two coordinates, in kilometres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use roadfuel_core::geodesy::haversine_km;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 0.0, y: 1.0 };
/// assert!((haversine_km(a, b) - 111.194_926_644_558_73).abs() < 1e-6);
/// ```
#[must_use]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let delta_lat = lat1 - lat2;
    let delta_lon = (from.x - to.x).to_radians();
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Element-wise distances between two equally long coordinate slices.
///
/// Extra elements of the longer slice are ignored.
#[must_use]
pub fn haversine_pairwise(from: &[Coord<f64>], to: &[Coord<f64>]) -> Vec<f64> {
    from.iter()
        .zip(to)
        .map(|(a, b)| haversine_km(*a, *b))
        .collect()
}

/// Distances from every coordinate in `points` to a single `target`.
#[must_use]
pub fn haversine_to_point(points: &[Coord<f64>], target: Coord<f64>) -> Vec<f64> {
    points
        .iter()
        .map(|point| haversine_km(*point, target))
        .collect()
}

//! Great-circle distance between coordinates.

use crate::domain::models::Coordinates;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two points.
///
/// Non-finite input yields `f64::INFINITY`, which never satisfies a
/// `<=` threshold comparison.
pub fn distance_meters(a: Coordinates, b: Coordinates) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return f64::INFINITY;
    }

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h fractionally above 1 for antipodal points.
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = Coordinates::new(16.2556, 81.1667);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = Coordinates::new(16.2556, 81.1667);
        let b = Coordinates::new(18.5667, 83.3667);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn test_known_distance_machilipatnam_to_vizianagaram_region() {
        let a = Coordinates::new(16.2556, 81.1667);
        let b = Coordinates::new(18.5667, 83.3667);
        let d = distance_meters(a, b);
        // ~347.15 km by haversine on a 6371 km sphere
        assert!((d - 347_153.0).abs() < 347_153.0 * 0.01, "got {d}");
    }

    #[test]
    fn test_one_degree_latitude() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111_195.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let d = distance_meters(a, b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn test_non_finite_input_is_infinite() {
        let good = Coordinates::new(16.0, 81.0);
        assert_eq!(distance_meters(good, Coordinates::new(f64::NAN, 81.0)), f64::INFINITY);
        assert_eq!(distance_meters(Coordinates::new(16.0, f64::INFINITY), good), f64::INFINITY);
        assert!(distance_meters(good, Coordinates::new(f64::NAN, 0.0)) > 15_000.0);
    }
}

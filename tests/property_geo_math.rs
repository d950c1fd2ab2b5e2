use proptest::prelude::*;
use villagewatch::domain::models::Coordinates;
use villagewatch::services::{distance_meters, EARTH_RADIUS_METERS};

fn coordinates() -> impl Strategy<Value = Coordinates> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
}

proptest! {
    /// Property: distance is symmetric
    #[test]
    fn prop_distance_symmetric(a in coordinates(), b in coordinates()) {
        let ab = distance_meters(a, b);
        let ba = distance_meters(b, a);
        prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0));
    }

    /// Property: distance is never negative and never exceeds half the
    /// circumference
    #[test]
    fn prop_distance_bounded(a in coordinates(), b in coordinates()) {
        let d = distance_meters(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_METERS + 1e-3);
    }

    /// Property: a point is at distance zero from itself
    #[test]
    fn prop_distance_to_self_is_zero(a in coordinates()) {
        prop_assert!(distance_meters(a, a).abs() < 1e-6);
    }

    /// Property: triangle inequality holds up to rounding
    ///
    /// `asin` loses precision near antipodal points, hence the metre of
    /// slack.
    #[test]
    fn prop_triangle_inequality(a in coordinates(), b in coordinates(), c in coordinates()) {
        let direct = distance_meters(a, c);
        let via = distance_meters(a, b) + distance_meters(b, c);
        prop_assert!(direct <= via + 1.0);
    }

    /// Property: along a meridian the distance is the arc length
    #[test]
    fn prop_meridian_distance_matches_arc(lat in -80.0f64..80.0, lng in -180.0f64..180.0, dlat in 0.0f64..10.0) {
        let a = Coordinates::new(lat, lng);
        let b = Coordinates::new(lat + dlat, lng);
        let expected = dlat.to_radians() * EARTH_RADIUS_METERS;
        prop_assert!((distance_meters(a, b) - expected).abs() < 1e-3);
    }
}

#[test]
fn test_non_finite_input_is_infinitely_far() {
    let nan = Coordinates::new(f64::NAN, 81.0);
    let here = Coordinates::new(16.0, 81.0);
    assert!(distance_meters(nan, here).is_infinite());
}

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two `(latitude, longitude)` points in degrees
///
/// Non finite inputs give `NaN`, callers must discard missing coordinates first.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point() {
        assert_eq!(0.0, distance_meters(39.4699, -0.3763, 39.4699, -0.3763));
        assert_eq!(0.0, distance_meters(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn symmetric() {
        let d1 = distance_meters(39.4699, -0.3763, 40.4168, -3.7038);
        let d2 = distance_meters(40.4168, -3.7038, 39.4699, -0.3763);
        assert!((d1 - d2).abs() < 1e-6);
    }

    #[test]
    fn known_distances() {
        // one degree of latitude
        let d = distance_meters(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_194.9).abs() < 1.0, "{}", d);
        // Valencia to Madrid
        let d = distance_meters(39.4699, -0.3763, 40.4168, -3.7038);
        assert!((d - 302_000.0).abs() < 2_000.0, "{}", d);
    }

    #[test]
    fn nan_propagates() {
        assert!(distance_meters(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }
}

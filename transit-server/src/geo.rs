//! Great-circle distance between stop coordinates.

/// Earth's mean radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points, in meters.
///
/// Coordinates are in degrees. Good to well under a meter at the
/// walking distances the transfer matcher cares about.
///
/// # Examples
///
/// ```
/// use transit_server::geo::haversine_distance;
///
/// // Same point: zero distance.
/// assert_eq!(haversine_distance(45.5, -73.56, 45.5, -73.56), 0.0);
/// ```
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_for_identical_points() {
        assert_eq!(haversine_distance(45.515, -73.561, 45.515, -73.561), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // One degree of latitude is roughly 111.2 km everywhere.
        let d = haversine_distance(45.0, -73.0, 46.0, -73.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn nearby_stops_in_montreal() {
        // Berri-UQAM to Saint-Laurent metro: a little under 500 m.
        let d = haversine_distance(45.5152, -73.5618, 45.5108, -73.5645);
        assert!(d > 400.0 && d < 600.0, "got {d}");
    }

    #[test]
    fn symmetric() {
        let a = haversine_distance(45.515, -73.561, 45.504, -73.573);
        let b = haversine_distance(45.504, -73.573, 45.515, -73.561);
        assert!((a - b).abs() < 1e-9);
    }
}

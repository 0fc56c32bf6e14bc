//! Spherical helpers for the journey globe.
//!
//! The globe texture is rotated a quarter turn relative to the usual
//! equirectangular layout, so every projection here adds 90 degrees to the
//! longitude before converting to Cartesian coordinates. Scene +Y is north.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Vec3;

/// Mean Earth radius used by the haversine distance (kilometers).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    NotFinite,
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::LatitudeOutOfRange(v) => write!(f, "latitude {v} outside [-90, 90]"),
            GeoError::LongitudeOutOfRange(v) => write!(f, "longitude {v} outside [-180, 180]"),
            GeoError::NotFinite => write!(f, "coordinate is not a finite number"),
        }
    }
}

impl std::error::Error for GeoError {}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checked constructor for coordinates coming from outside the process.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Linear interpolation of latitude and longitude.
    ///
    /// Longitude takes the short way round, so a span across the
    /// antimeridian stays in the Pacific. The result is kept in (-180, 180].
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let d_lng = wrap_longitude(other.longitude - self.longitude);
        Self::new(
            self.latitude + (other.latitude - self.latitude) * t,
            wrap_longitude(self.longitude + d_lng * t),
        )
    }
}

// Folds into (-180, 180]; in-range values pass through untouched.
fn wrap_longitude(deg: f64) -> f64 {
    if deg > 180.0 {
        deg - 360.0
    } else if deg <= -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Project a geographic point onto the globe sphere of `radius`.
pub fn to_vector3(point: GeoPoint, radius: f64) -> Vec3 {
    let lat = point.latitude.to_radians();
    let lng = point.longitude.to_radians() + std::f64::consts::FRAC_PI_2;
    Vec3::new(
        radius * lat.cos() * lng.sin(),
        radius * lat.sin(),
        radius * lat.cos() * lng.cos(),
    )
}

/// Haversine distance in kilometers.
pub fn great_circle_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lng / 2.0).sin()
            * (d_lng / 2.0).sin();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance rounded down to whole kilometers, as shown to the user.
pub fn display_distance_km(a: GeoPoint, b: GeoPoint) -> u32 {
    great_circle_distance_km(a, b).floor() as u32
}

/// Central angle between two points (radians).
fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let cos_d = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * d_lng.cos();
    cos_d.clamp(-1.0, 1.0).acos()
}

/// `sample_count + 1` points along the great circle from `a` to `b`.
///
/// Endpoints are the inputs themselves. Coincident inputs produce copies of
/// `a`; `sample_count == 0` produces `[a]`.
pub fn sample_great_circle(a: GeoPoint, b: GeoPoint, sample_count: usize) -> Vec<GeoPoint> {
    if sample_count == 0 {
        return vec![a];
    }

    let d = angular_distance(a, b);
    if a == b || d == 0.0 {
        return vec![a; sample_count + 1];
    }

    let lat1 = a.latitude.to_radians();
    let lng1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lng2 = b.longitude.to_radians();
    let sin_d = d.sin();

    let mut points = Vec::with_capacity(sample_count + 1);
    points.push(a);
    for i in 1..sample_count {
        let f = i as f64 / sample_count as f64;
        let wa = ((1.0 - f) * d).sin() / sin_d;
        let wb = (f * d).sin() / sin_d;

        let x = wa * lat1.cos() * lng1.cos() + wb * lat2.cos() * lng2.cos();
        let y = wa * lat1.cos() * lng1.sin() + wb * lat2.cos() * lng2.sin();
        let z = wa * lat1.sin() + wb * lat2.sin();

        points.push(GeoPoint::new(
            z.atan2((x * x + y * y).sqrt()).to_degrees(),
            y.atan2(x).to_degrees(),
        ));
    }
    points.push(b);
    points
}

/// Initial compass bearing from `a` to `b` in degrees, within (-180, 180].
pub fn bearing(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();
    let deg = y.atan2(x).to_degrees();
    if deg <= -180.0 { deg + 360.0 } else { deg }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKYO: GeoPoint = GeoPoint::new(35.6762, 139.6503);
    const SAN_FRANCISCO: GeoPoint = GeoPoint::new(37.7749, -122.4194);

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn projection_lies_on_sphere() {
        for lat in [-90.0, -45.5, 0.0, 12.25, 89.9, 90.0] {
            for lng in [-180.0, -122.4, 0.0, 33.3, 139.65, 180.0] {
                let v = to_vector3(GeoPoint::new(lat, lng), 3.01);
                assert_close(v.length(), 3.01, 1e-12);
            }
        }
    }

    #[test]
    fn projection_applies_quarter_turn() {
        // Null island lands on +X rather than +Z.
        let v = to_vector3(GeoPoint::new(0.0, 0.0), 2.0);
        assert_close(v.x, 2.0, 1e-12);
        assert_close(v.y, 0.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);

        let north = to_vector3(GeoPoint::new(90.0, 45.0), 2.0);
        assert_close(north.y, 2.0, 1e-12);
    }

    #[test]
    fn distance_is_zero_and_symmetric() {
        assert_eq!(great_circle_distance_km(TOKYO, TOKYO), 0.0);
        let ab = great_circle_distance_km(TOKYO, SAN_FRANCISCO);
        let ba = great_circle_distance_km(SAN_FRANCISCO, TOKYO);
        assert_close(ab, ba, 1e-9);
        // Tokyo to San Francisco is a little over 8,200 km.
        assert!(ab > 8_200.0 && ab < 8_300.0, "unexpected distance {ab}");
        assert_eq!(display_distance_km(TOKYO, SAN_FRANCISCO), ab.floor() as u32);
    }

    #[test]
    fn samples_have_pinned_endpoints() {
        let points = sample_great_circle(TOKYO, SAN_FRANCISCO, 37);
        assert_eq!(points.len(), 38);
        assert_close(points[0].latitude, TOKYO.latitude, 1e-6);
        assert_close(points[0].longitude, TOKYO.longitude, 1e-6);
        let last = points[points.len() - 1];
        assert_close(last.latitude, SAN_FRANCISCO.latitude, 1e-6);
        assert_close(last.longitude, SAN_FRANCISCO.longitude, 1e-6);
    }

    #[test]
    fn samples_are_evenly_spaced_along_the_arc() {
        let points = sample_great_circle(TOKYO, SAN_FRANCISCO, 20);
        let total = great_circle_distance_km(TOKYO, SAN_FRANCISCO);
        for pair in points.windows(2) {
            let step = great_circle_distance_km(pair[0], pair[1]);
            assert_close(step, total / 20.0, 1e-6);
        }
    }

    #[test]
    fn coincident_samples_repeat_the_start() {
        let points = sample_great_circle(TOKYO, TOKYO, 8);
        assert_eq!(points, vec![TOKYO; 9]);
        assert!(points.iter().all(|p| p.latitude.is_finite()));
    }

    #[test]
    fn zero_samples_is_just_the_start() {
        assert_eq!(sample_great_circle(TOKYO, SAN_FRANCISCO, 0), vec![TOKYO]);
    }

    #[test]
    fn lerp_takes_short_way_across_antimeridian() {
        let west = GeoPoint::new(40.0, 178.0);
        let east = GeoPoint::new(42.0, -178.0);
        let mid = west.lerp(east, 0.5);
        assert_close(mid.latitude, 41.0, 1e-12);
        assert_close(mid.longitude.abs(), 180.0, 1e-12);
        assert_close(west.lerp(east, 0.75).longitude, -179.0, 1e-12);
        assert_close(east.lerp(west, 0.25).longitude, -179.0, 1e-12);
        assert_close(west.lerp(east, 0.25).longitude, 179.0, 1e-12);
        // Short spans away from the antimeridian are untouched.
        let a = GeoPoint::new(0.0, 10.0);
        assert_eq!(a.lerp(GeoPoint::new(0.0, 20.0), 0.2), GeoPoint::new(0.0, 12.0));
        assert_eq!(TOKYO.lerp(SAN_FRANCISCO, 0.0), TOKYO);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert_close(bearing(origin, GeoPoint::new(10.0, 0.0)), 0.0, 1e-9);
        assert_close(bearing(origin, GeoPoint::new(0.0, 10.0)), 90.0, 1e-9);
        assert_close(bearing(origin, GeoPoint::new(0.0, -10.0)), -90.0, 1e-9);
        assert_close(bearing(origin, GeoPoint::new(-10.0, 0.0)), 180.0, 1e-9);
        assert_eq!(bearing(TOKYO, TOKYO), 0.0);
    }

    #[test]
    fn bearing_from_tokyo_heads_north_east() {
        let b = bearing(TOKYO, SAN_FRANCISCO);
        assert!(b > 0.0 && b < 90.0, "unexpected bearing {b}");
    }

    #[test]
    fn validated_rejects_bad_input() {
        assert_eq!(
            GeoPoint::validated(91.0, 0.0),
            Err(GeoError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            GeoPoint::validated(0.0, -180.5),
            Err(GeoError::LongitudeOutOfRange(-180.5))
        );
        assert_eq!(GeoPoint::validated(f64::NAN, 0.0), Err(GeoError::NotFinite));
        assert_eq!(GeoPoint::validated(35.0, 139.0), Ok(GeoPoint::new(35.0, 139.0)));
    }
}

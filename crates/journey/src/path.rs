use foundation::math::{GeoPoint, Vec3, great_circle_distance_km, sample_great_circle, to_vector3};

use crate::config::BridgeConfig;

/// Great-circle samples between two cities, start first.
///
/// Rebuilt whenever either endpoint changes; never mutated in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeodesicPath {
    points: Vec<GeoPoint>,
    distance_km: f64,
}

impl GeodesicPath {
    pub fn new(start: GeoPoint, end: GeoPoint, sample_count: usize) -> Self {
        Self {
            points: sample_great_circle(start, end, sample_count),
            distance_km: great_circle_distance_km(start, end),
        }
    }

    /// Path whose sample density follows the route length.
    pub fn adaptive(start: GeoPoint, end: GeoPoint, config: &BridgeConfig) -> Self {
        let distance_km = great_circle_distance_km(start, end);
        let samples = adaptive_sample_count(distance_km, config);
        Self {
            points: sample_great_circle(start, end, samples),
            distance_km,
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Option<GeoPoint> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<GeoPoint> {
        self.points.last().copied()
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn project(&self, radius: f64) -> Vec<Vec3> {
        self.points.iter().map(|p| to_vector3(*p, radius)).collect()
    }

    /// Point at `progress` in [0, 1], linear in lat/lng between the two
    /// bracketing samples.
    pub fn point_at(&self, progress: f64) -> Option<GeoPoint> {
        let last = self.points.len().checked_sub(1)?;
        let exact = progress.clamp(0.0, 1.0) * last as f64;
        let lower = (exact.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let t = exact - lower as f64;
        Some(self.points[lower].lerp(self.points[upper], t))
    }
}

/// `floor(distance / km_per_sample)` clamped to the configured range.
pub fn adaptive_sample_count(distance_km: f64, config: &BridgeConfig) -> usize {
    let raw = (distance_km / config.km_per_sample).floor();
    let raw = if raw.is_finite() && raw > 0.0 { raw as usize } else { 0 };
    raw.clamp(config.min_path_samples, config.max_path_samples)
}

//! Bridge segment layout along a geodesic path.
//!
//! Segments are laid end to end at a fixed arc-length spacing on the
//! projected 3D polyline. Each one is oriented so its local +Y points away
//! from the globe centre and its length runs along the path.

use foundation::math::{Quat, Vec3};
use foundation::time::Millis;
use serde::Serialize;

use crate::config::BridgeConfig;
use crate::path::GeodesicPath;

/// Radius of the sphere bridge segments sit on.
pub const BRIDGE_SPHERE_RADIUS: f64 = 3.01;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct BridgeSegment {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale_factor: f64,
    pub surface_normal: Vec3,
}

/// What the renderer applies to one bridge model instance.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct SegmentTransform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl BridgeSegment {
    pub fn render_transform(&self, config: &BridgeConfig) -> SegmentTransform {
        let [sx, sy, sz] = config.model_scale;
        SegmentTransform {
            position: self.position + self.surface_normal * config.surface_lift,
            orientation: self.orientation,
            scale: Vec3::new(sx, sy, sz) * self.scale_factor,
        }
    }
}

/// Segment scale for a route of `distance_km`.
pub fn segment_scale(distance_km: f64, config: &BridgeConfig) -> f64 {
    config.max_scale.min(distance_km / config.scale_distance_km)
}

/// Arc-length layout over one projected path.
///
/// Holds the projected polyline and its cumulative lengths so per-frame
/// queries do not re-project the path.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgePlanner {
    points: Vec<Vec3>,
    // cumulative[i] is the arc length from points[0] to points[i].
    cumulative: Vec<f64>,
    spacing: f64,
    start_offset: f64,
}

impl BridgePlanner {
    pub fn new(path: &GeodesicPath, radius: f64, spacing: f64, start_offset: f64) -> Self {
        Self::from_points(path.project(radius), spacing, start_offset)
    }

    pub fn from_points(points: Vec<Vec3>, spacing: f64, start_offset: f64) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance(*p);
            }
            cumulative.push(total);
        }
        Self {
            points,
            cumulative,
            spacing,
            start_offset,
        }
    }

    pub fn total_length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// How many segments fit after the start offset, rounding up.
    pub fn max_segments(&self) -> usize {
        max_segments_for_length(self.total_length(), self.spacing, self.start_offset)
    }

    /// Segment `index`, or `None` when the path has no extent to lay it on.
    ///
    /// Indices past the end of the path land on the path's end point.
    pub fn segment(
        &self,
        index: usize,
        scale_basis_km: f64,
        config: &BridgeConfig,
    ) -> Option<BridgeSegment> {
        let target = (self.start_offset + index as f64 * self.spacing).min(self.total_length());

        let span = (1..self.points.len())
            .filter(|&j| self.cumulative[j] > self.cumulative[j - 1])
            .find(|&j| self.cumulative[j] >= target)?;

        let from = self.points[span - 1];
        let to = self.points[span];
        let span_len = self.cumulative[span] - self.cumulative[span - 1];
        let fraction = ((target - self.cumulative[span - 1]) / span_len).clamp(0.0, 1.0);

        let position = from.lerp(to, fraction);
        let normal = position.normalize();
        let direction = (to - from).normalize();
        let tangent = (direction - normal * direction.dot(normal)).normalize();
        let right = normal.cross(tangent).normalize();

        // Quarter turn about local +Y to match how the bridge asset is modelled.
        let yaw = Quat::from_axis_angle(Vec3::Y, std::f64::consts::FRAC_PI_2);
        let orientation = Quat::from_basis(right, normal, tangent).mul(yaw);

        Some(BridgeSegment {
            position,
            orientation,
            scale_factor: segment_scale(scale_basis_km, config),
            surface_normal: normal,
        })
    }

    /// The first `min(requested, max_segments)` segments.
    pub fn plan(
        &self,
        requested: usize,
        scale_basis_km: f64,
        config: &BridgeConfig,
    ) -> Vec<BridgeSegment> {
        let count = requested.min(self.max_segments());
        (0..count)
            .filter_map(|i| self.segment(i, scale_basis_km, config))
            .collect()
    }
}

/// `ceil(max(0, length - start_offset) / spacing)`; zero for a
/// non-positive spacing.
pub fn max_segments_for_length(total_length: f64, spacing: f64, start_offset: f64) -> usize {
    if spacing.is_nan() || spacing <= 0.0 {
        return 0;
    }
    let available = (total_length - start_offset).max(0.0);
    (available / spacing).ceil() as usize
}

/// Segment capacity of `path` projected onto the default bridge sphere
/// ([`BRIDGE_SPHERE_RADIUS`]).
///
/// A configured `globe.bridge_sphere_radius` is not consulted; build a
/// [`BridgePlanner`] with that radius instead.
pub fn compute_max_segments(path: &GeodesicPath, spacing: f64, start_offset: f64) -> usize {
    BridgePlanner::new(path, BRIDGE_SPHERE_RADIUS, spacing, start_offset).max_segments()
}

/// Segment `index` of `path` on the default bridge sphere, scaled with the
/// default [`BridgeConfig`].
///
/// Custom radius or scale settings need [`BridgePlanner::segment`].
pub fn compute_segment(
    path: &GeodesicPath,
    index: usize,
    spacing: f64,
    start_offset: f64,
    scale_basis_km: f64,
) -> Option<BridgeSegment> {
    let config = BridgeConfig::default();
    BridgePlanner::new(path, BRIDGE_SPHERE_RADIUS, spacing, start_offset).segment(
        index,
        scale_basis_km,
        &config,
    )
}

/// Cubic ease-out: fast start, gentle landing.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// A freshly placed segment falling into place from above the globe.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DropAnimation {
    pub started_at: Millis,
    pub from_height: f64,
    pub duration_ms: u64,
}

impl DropAnimation {
    pub fn new(started_at: Millis, config: &BridgeConfig) -> Self {
        Self {
            started_at,
            from_height: config.drop_height,
            duration_ms: config.drop_duration_ms,
        }
    }

    fn progress(&self, now: Millis) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        now.since(self.started_at) as f64 / self.duration_ms as f64
    }

    /// World-space height of the segment at `now`, landing on `target_y`.
    pub fn height_at(&self, now: Millis, target_y: f64) -> f64 {
        let eased = ease_out_cubic(self.progress(now));
        self.from_height + (target_y - self.from_height) * eased
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        self.progress(now) >= 1.0
    }
}

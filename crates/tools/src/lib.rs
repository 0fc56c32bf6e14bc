//! Offline inspection of journey routes for the `journey` binary.

use foundation::math::{GeoPoint, Vec3, bearing, display_distance_km};
use foundation::time::Millis;
use journey::{
    BridgePlanner, City, FollowState, GeodesicPath, JourneyConfig, JourneyView, SegmentTransform,
    SimpleRig,
};
use runtime::Frame;
use serde::Serialize;

/// Parses `"LAT,LNG"` in decimal degrees.
pub fn parse_geo_point(input: &str) -> Result<GeoPoint, String> {
    let (lat, lng) = input
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got {input:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("latitude {lat:?}: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("longitude {lng:?}: {e}"))?;
    GeoPoint::validated(lat, lng).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceReport {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub distance_km: f64,
    pub label: String,
    pub bearing_deg: f64,
}

pub fn distance_report(config: &JourneyConfig, home: GeoPoint) -> DistanceReport {
    let to = config.reference_city.location;
    let path = GeodesicPath::new(home, to, 1);
    DistanceReport {
        from: home,
        to,
        distance_km: path.distance_km(),
        label: format!("{:04} km", display_distance_km(home, to)),
        bearing_deg: bearing(home, to),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub reference_city: String,
    pub distance_km: f64,
    pub path_points: usize,
    pub max_segments: usize,
    pub segments: Vec<SegmentTransform>,
}

/// Bridge layout toward the reference city. `count` defaults to the full
/// capacity of the route.
pub fn plan_report(config: &JourneyConfig, home: GeoPoint, count: Option<usize>) -> PlanReport {
    let bridge = &config.bridge;
    let path = GeodesicPath::adaptive(home, config.reference_city.location, bridge);
    let planner = BridgePlanner::new(
        &path,
        config.globe.bridge_sphere_radius,
        bridge.spacing,
        bridge.start_offset,
    );
    let max_segments = planner.max_segments();
    let segments = planner
        .plan(count.unwrap_or(max_segments), path.distance_km(), bridge)
        .iter()
        .map(|s| s.render_transform(bridge))
        .collect();
    PlanReport {
        reference_city: config.reference_city.name.clone(),
        distance_km: path.distance_km(),
        path_points: path.len(),
        max_segments,
        segments,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedFrame {
    pub index: u64,
    pub milestone: usize,
    pub segment_count: usize,
    pub smoothed_progress: f64,
    pub camera: Vec3,
    pub state: FollowState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub max_segments: usize,
    pub distance_label: Option<String>,
    pub frames: Vec<SimulatedFrame>,
}

// `--frames` is user input; larger runs grow the buffer as they go.
const MAX_PREALLOCATED_FRAMES: u64 = 1 << 16;

/// Runs a locked camera through every milestone at 60 fps, pressing "next"
/// every `frames_per_milestone` frames.
pub fn simulate(
    config: &JourneyConfig,
    home: GeoPoint,
    frames: u64,
    frames_per_milestone: u64,
) -> SimulationReport {
    let mut view = JourneyView::new(config.clone(), config.navigation.default_milestones);
    let mut rig = SimpleRig::new(config.camera.initial_position);
    view.set_home(City::new("home", home), Millis(0));
    view.start();

    let mut frame = Frame::fixed(0, 1.0 / 60.0);
    let mut out = Vec::with_capacity(frames.min(MAX_PREALLOCATED_FRAMES) as usize);
    for _ in 0..frames {
        if frames_per_milestone > 0 && frame.index > 0 && frame.index % frames_per_milestone == 0 {
            view.on_next(frame.now);
        }
        view.frame(frame, Some(&mut rig));
        out.push(SimulatedFrame {
            index: frame.index,
            milestone: view.navigator().index(),
            segment_count: view.segment_count(),
            smoothed_progress: view.follower().smoothed_progress(),
            camera: rig.position,
            state: view.follower().state(),
        });
        frame = frame.next();
    }
    tracing::debug!(events = view.events().drain().len(), "simulation finished");

    SimulationReport {
        max_segments: view.max_segments(),
        distance_label: view.distance_label(),
        frames: out,
    }
}

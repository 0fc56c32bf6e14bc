use foundation::math::{GeoPoint, display_distance_km};
use foundation::time::Millis;
use runtime::{EventBus, Frame};
use serde::Serialize;
use tracing::{debug, info};

use crate::bridge::{BridgePlanner, DropAnimation, SegmentTransform};
use crate::camera::{CameraFollower, CameraRig, FollowInput, FollowState, FrameOutcome};
use crate::config::JourneyConfig;
use crate::navigation::{MilestoneNavigator, planned_bridge_count};
use crate::path::GeodesicPath;
use crate::placement::{BridgePlacement, PlacementCue};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub name: String,
    pub location: GeoPoint,
}

impl City {
    pub fn new(name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JourneyEvent {
    /// Play the "bridge placed" click.
    BridgePlaced { city: String, count: usize },
    /// Play the "bridge removed" sound.
    BridgesRemoved { city: String, count: usize },
    MilestoneChanged { index: usize },
    CameraState(FollowState),
}

impl From<PlacementCue> for JourneyEvent {
    fn from(cue: PlacementCue) -> Self {
        match cue {
            PlacementCue::Placed { city, count } => JourneyEvent::BridgePlaced { city, count },
            PlacementCue::Removed { city, count } => JourneyEvent::BridgesRemoved { city, count },
        }
    }
}

/// One bridge model instance as it should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibleSegment {
    pub index: usize,
    pub transform: SegmentTransform,
}

// Everything derived from the current home city; rebuilt on change.
#[derive(Debug, Clone)]
struct Route {
    home: City,
    bridge_path: GeodesicPath,
    planner: BridgePlanner,
    max_segments: usize,
}

/// Owns the whole journey globe state for one page view.
///
/// The host feeds input events and calls [`JourneyView::frame`] once per
/// rendered frame; cues for sound playback come out of [`JourneyView::events`].
#[derive(Debug)]
pub struct JourneyView {
    config: JourneyConfig,
    route: Option<Route>,
    placement: BridgePlacement,
    navigator: MilestoneNavigator,
    follower: CameraFollower,
    drops: Vec<DropAnimation>,
    started: bool,
    camera_locked: bool,
    current_frame: Frame,
    events: EventBus<JourneyEvent>,
}

impl JourneyView {
    pub fn new(config: JourneyConfig, milestone_count: usize) -> Self {
        let navigator = MilestoneNavigator::new(milestone_count, config.navigation.clone());
        let follower =
            CameraFollower::new(config.camera.clone(), config.globe.camera_sphere_radius);
        let placement = BridgePlacement::new(config.placement.clone());
        Self {
            config,
            route: None,
            placement,
            navigator,
            follower,
            drops: Vec::new(),
            started: false,
            camera_locked: true,
            current_frame: Frame::fixed(0, 0.0),
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &JourneyConfig {
        &self.config
    }

    pub fn reference_city(&self) -> City {
        City::new(
            self.config.reference_city.name.clone(),
            self.config.reference_city.location,
        )
    }

    pub fn home(&self) -> Option<&City> {
        self.route.as_ref().map(|r| &r.home)
    }

    pub fn bridge_path(&self) -> Option<&GeodesicPath> {
        self.route.as_ref().map(|r| &r.bridge_path)
    }

    pub fn max_segments(&self) -> usize {
        self.route.as_ref().map_or(0, |r| r.max_segments)
    }

    pub fn segment_count(&self) -> usize {
        self.route
            .as_ref()
            .map_or(0, |r| self.placement.count(&r.home.name))
    }

    pub fn navigator(&self) -> &MilestoneNavigator {
        &self.navigator
    }

    pub fn follower(&self) -> &CameraFollower {
        &self.follower
    }

    pub fn events(&mut self) -> &mut EventBus<JourneyEvent> {
        &mut self.events
    }

    pub fn is_camera_locked(&self) -> bool {
        self.camera_locked
    }

    /// User leaves the intro screen; the camera may follow from now on.
    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn set_camera_locked(&mut self, locked: bool) {
        self.camera_locked = locked;
    }

    pub fn toggle_camera_lock(&mut self) -> bool {
        self.camera_locked = !self.camera_locked;
        self.camera_locked
    }

    /// Set or replace the home city; the bridge and camera paths are rebuilt.
    pub fn set_home(&mut self, home: City, now: Millis) {
        let reference = self.config.reference_city.location;
        let bridge_cfg = &self.config.bridge;
        let bridge_path = GeodesicPath::adaptive(home.location, reference, bridge_cfg);
        let planner = BridgePlanner::new(
            &bridge_path,
            self.config.globe.bridge_sphere_radius,
            bridge_cfg.spacing,
            bridge_cfg.start_offset,
        );
        let max_segments = planner.max_segments();
        info!(
            home = %home.name,
            distance_km = bridge_path.distance_km(),
            max_segments,
            "journey route built"
        );

        if let Some(old) = self.route.take() {
            if old.home.name != home.name {
                self.placement.forget(&old.home.name);
            }
        }
        self.drops.clear();

        let camera_path =
            GeodesicPath::new(home.location, reference, self.config.camera.path_samples);
        self.follower.set_path(camera_path);

        let cues = self
            .placement
            .set_max(&home.name, max_segments, self.navigator.total(), now);
        self.route = Some(Route {
            home,
            bridge_path,
            planner,
            max_segments,
        });
        self.apply_cues(cues, now);
    }

    pub fn on_wheel(&mut self, delta_y: f64, now: Millis) {
        if self.route.is_none() {
            return;
        }
        if let Some(index) = self.navigator.wheel(delta_y, now) {
            self.sync_bridges(index, now);
        }
    }

    pub fn on_next(&mut self, now: Millis) {
        if let Some(index) = self.navigator.next(now) {
            self.sync_bridges(index, now);
        }
    }

    pub fn on_prev(&mut self, now: Millis) {
        if let Some(index) = self.navigator.prev(now) {
            self.sync_bridges(index, now);
        }
    }

    fn sync_bridges(&mut self, index: usize, now: Millis) {
        self.events
            .emit(self.current_frame, JourneyEvent::MilestoneChanged { index });
        let Some(route) = &self.route else {
            return;
        };
        let planned = planned_bridge_count(index, route.max_segments, self.navigator.total());
        debug!(index, planned, "milestone changed");
        let city = route.home.name.clone();
        let cues = self.placement.request(&city, planned, now);
        self.apply_cues(cues, now);
    }

    fn apply_cues(&mut self, cues: Vec<PlacementCue>, now: Millis) {
        for cue in &cues {
            match cue {
                PlacementCue::Placed { count, .. } => {
                    if self.drops.len() < *count {
                        self.drops
                            .resize(*count, DropAnimation::new(now, &self.config.bridge));
                    }
                }
                PlacementCue::Removed { count, .. } => self.drops.truncate(*count),
            }
        }
        self.events
            .extend(self.current_frame, cues.into_iter().map(JourneyEvent::from));
    }

    /// Advance timers and the camera for one rendered frame.
    pub fn frame<R: CameraRig + ?Sized>(
        &mut self,
        frame: Frame,
        rig: Option<&mut R>,
    ) -> FrameOutcome {
        self.current_frame = frame;
        self.navigator.tick(frame.now);
        let cues = self.placement.tick(frame.now);
        self.apply_cues(cues, frame.now);

        let input = FollowInput {
            is_locked: self.camera_locked && self.started,
            milestone_index: self.navigator.index(),
            total_milestones: self.navigator.total(),
            segment_count: self.segment_count(),
            // Unknown capacity counts as 1 so the bridge term stays defined.
            max_segments: self.route.as_ref().map_or(1, |r| r.max_segments.max(1)),
        };
        let before = self.follower.state();
        let outcome = self.follower.update(&input, rig);
        let after = self.follower.state();
        if before != after {
            self.events.emit(frame, JourneyEvent::CameraState(after));
        }
        outcome
    }

    /// Placed segments with their drop animation applied at `now`.
    pub fn visible_segments(&self, now: Millis) -> Vec<VisibleSegment> {
        let Some(route) = &self.route else {
            return Vec::new();
        };
        let bridge_cfg = &self.config.bridge;
        let count = self.placement.count(&route.home.name);
        route
            .planner
            .plan(count, route.bridge_path.distance_km(), bridge_cfg)
            .into_iter()
            .enumerate()
            .map(|(index, segment)| {
                let mut transform = segment.render_transform(bridge_cfg);
                if let Some(drop) = self.drops.get(index) {
                    transform.position.y = drop.height_at(now, transform.position.y);
                }
                VisibleSegment { index, transform }
            })
            .collect()
    }

    /// "NNNN km" once the whole bridge stands, otherwise `None`.
    pub fn distance_label(&self) -> Option<String> {
        let route = self.route.as_ref()?;
        let count = self.placement.count(&route.home.name);
        if route.max_segments == 0 || count < route.max_segments {
            return None;
        }
        let km = display_distance_km(route.home.location, self.config.reference_city.location);
        Some(format!("{km:04} km"))
    }
}

//! Camera that rides along the bridge route as the journey progresses.
//!
//! This module provides a per-frame follower that:
//! - Low-pass filters the raw progress signal so discrete jumps glide
//! - Samples the geodesic path at the filtered progress
//! - Keeps an oblique offset from the sampled surface point
//! - Eases the applied camera toward its target every frame
//!
//! The follower never owns the camera. It reads and writes it through
//! [`CameraRig`] so any rendering backend can sit behind it.

use foundation::math::{Vec3, to_vector3};
use serde::Serialize;
use tracing::debug;

use crate::config::CameraConfig;
use crate::path::GeodesicPath;
use crate::progress::compute_progress;

/// The host camera plus its orbit controls.
pub trait CameraRig {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn look_at(&mut self, target: Vec3);
    /// Orbit-controls pivot, or `None` when the controls are not mounted.
    fn controls_target(&self) -> Option<Vec3>;
    fn set_controls_target(&mut self, target: Vec3);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FollowState {
    /// No valid frame seen since creation or the last path change.
    #[default]
    Uninitialized,
    /// The follower drives the camera.
    Following,
    /// Nothing is written to the camera: either the user unlocked it and
    /// owns orbit/pan/zoom, or it is locked but there is no progress to
    /// follow yet.
    Idle,
}

/// Counters the follower reads each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FollowInput {
    pub is_locked: bool,
    pub milestone_index: usize,
    pub total_milestones: usize,
    pub segment_count: usize,
    pub max_segments: usize,
}

impl FollowInput {
    fn raw_progress(&self) -> f64 {
        compute_progress(
            self.milestone_index,
            self.total_milestones,
            self.segment_count,
            self.max_segments,
        )
    }
}

/// What a call to [`CameraFollower::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No path, rig or controls; nothing happened.
    Skipped,
    /// Valid frame, but the follower is not driving the camera.
    Idle,
    /// The camera was moved.
    Moved,
}

/// Smoothed camera quantities carried from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CameraFollowState {
    pub smoothed_progress: f64,
    pub current_position: Vec3,
    pub current_look_at: Vec3,
    pub target_position: Vec3,
    pub target_look_at: Vec3,
}

#[derive(Debug, Clone)]
pub struct CameraFollower {
    config: CameraConfig,
    radius: f64,
    path: GeodesicPath,
    state: FollowState,
    follow: CameraFollowState,
}

impl CameraFollower {
    /// `radius` is the sphere the camera path is projected onto.
    pub fn new(config: CameraConfig, radius: f64) -> Self {
        Self {
            config,
            radius,
            path: GeodesicPath::default(),
            state: FollowState::Uninitialized,
            follow: CameraFollowState::default(),
        }
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    pub fn follow_state(&self) -> &CameraFollowState {
        &self.follow
    }

    pub fn smoothed_progress(&self) -> f64 {
        self.follow.smoothed_progress
    }

    pub fn path(&self) -> &GeodesicPath {
        &self.path
    }

    /// Swap in the path for a new target city.
    ///
    /// Progress restarts from zero and the next valid frame re-seeds from the
    /// camera's actual position, so the switch never teleports the camera.
    pub fn set_path(&mut self, path: GeodesicPath) {
        self.path = path;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.state = FollowState::Uninitialized;
        self.follow = CameraFollowState::default();
    }

    /// Advance one rendered frame.
    pub fn update<R: CameraRig + ?Sized>(
        &mut self,
        input: &FollowInput,
        rig: Option<&mut R>,
    ) -> FrameOutcome {
        if self.path.is_empty() {
            return FrameOutcome::Skipped;
        }
        let Some(rig) = rig else {
            return FrameOutcome::Skipped;
        };
        let Some(controls_target) = rig.controls_target() else {
            return FrameOutcome::Skipped;
        };

        if self.state == FollowState::Uninitialized {
            self.seed(rig.position());
        }

        let raw = input.raw_progress();
        let drive = input.is_locked && (raw > 0.0 || input.milestone_index > 0);
        let next = if drive {
            FollowState::Following
        } else {
            FollowState::Idle
        };
        if next != self.state {
            debug!(from = ?self.state, to = ?next, raw, "camera follow state change");
            self.state = next;
        }
        if !drive {
            return FrameOutcome::Idle;
        }

        self.step(raw);

        rig.set_position(self.follow.current_position);
        rig.look_at(self.follow.current_look_at);
        let controls_blend = self.config.position_blend * self.config.controls_blend_scale;
        rig.set_controls_target(controls_target.lerp(self.follow.current_look_at, controls_blend));
        FrameOutcome::Moved
    }

    fn seed(&mut self, camera_position: Vec3) {
        self.follow.current_position = camera_position;
        self.follow.target_position = camera_position;
        self.follow.current_look_at = Vec3::ZERO;
        self.follow.target_look_at = Vec3::ZERO;
        debug!(?camera_position, "camera follower seeded");
    }

    fn step(&mut self, raw_progress: f64) {
        let cfg = &self.config;
        let f = &mut self.follow;

        f.smoothed_progress += (raw_progress - f.smoothed_progress) * cfg.progress_smoothing;

        if let Some(point) = self.path.point_at(f.smoothed_progress) {
            let surface = to_vector3(point, self.radius);
            let desired = surface + cfg.offset_direction * cfg.offset_distance;
            f.target_position = f.target_position.lerp(desired, cfg.target_blend);
            f.target_look_at = f.target_look_at.lerp(surface, cfg.target_blend);
        }

        f.current_position = f.current_position.lerp(f.target_position, cfg.position_blend);
        f.current_look_at = f.current_look_at.lerp(f.target_look_at, cfg.position_blend);
    }
}

/// Plain camera state for hosts and tests without a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimpleRig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub controls: Option<Vec3>,
}

impl SimpleRig {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            look_at: Vec3::ZERO,
            controls: Some(Vec3::ZERO),
        }
    }
}

impl CameraRig for SimpleRig {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn look_at(&mut self, target: Vec3) {
        self.look_at = target;
    }

    fn controls_target(&self) -> Option<Vec3> {
        self.controls
    }

    fn set_controls_target(&mut self, target: Vec3) {
        self.controls = Some(target);
    }
}

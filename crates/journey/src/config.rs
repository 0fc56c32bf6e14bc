//! Tunable constants for the journey globe.
//!
//! Defaults are the canonical parameter set. A JSON file may override any
//! subset of fields; missing fields keep their defaults.

use std::fmt;
use std::fs;
use std::path::Path;

use foundation::math::{GeoPoint, Vec3};
use serde::{Deserialize, Serialize};

/// Fixed reference city every bridge leads to.
pub const SAN_FRANCISCO: GeoPoint = GeoPoint::new(37.7749, -122.4194);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JourneyConfig {
    pub reference_city: ReferenceCity,
    pub globe: GlobeConfig,
    pub bridge: BridgeConfig,
    pub camera: CameraConfig,
    pub navigation: NavigationConfig,
    pub placement: PlacementConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceCity {
    pub name: String,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Sphere the camera path is projected onto.
    pub camera_sphere_radius: f64,
    /// Sphere bridge segments sit on, just above the textured surface.
    pub bridge_sphere_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Arc length reserved per segment (scene units).
    pub spacing: f64,
    /// Gap left between the home city and the first segment.
    pub start_offset: f64,
    pub min_path_samples: usize,
    pub max_path_samples: usize,
    /// One path sample per this many kilometers, before clamping.
    pub km_per_sample: f64,
    pub max_scale: f64,
    /// Route length (km) at which a segment would reach scale 1.0.
    pub scale_distance_km: f64,
    /// Per-axis multiplier applied to the bridge model.
    pub model_scale: [f64; 3],
    /// Lift along the surface normal so segments do not z-fight the globe.
    pub surface_lift: f64,
    pub drop_height: f64,
    pub drop_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub path_samples: usize,
    pub progress_smoothing: f64,
    /// Easing of the target position/look-at toward the sampled path point.
    pub target_blend: f64,
    /// Easing of the applied camera position/look-at toward the targets.
    pub position_blend: f64,
    /// Orbit controls ease at `position_blend * controls_blend_scale`.
    pub controls_blend_scale: f64,
    pub offset_direction: Vec3,
    pub offset_distance: f64,
    /// Where the host camera starts before following kicks in.
    pub initial_position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub button_cooldown_ms: u64,
    pub wheel_cooldown_ms: u64,
    pub wheel_min_delta: f64,
    pub transition_ms: u64,
    /// Milestone count assumed when a journey has none yet.
    pub default_milestones: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub step_delay_ms: u64,
    pub initial_step_delay_ms: u64,
}

impl Default for ReferenceCity {
    fn default() -> Self {
        Self {
            name: "San Francisco".to_string(),
            location: SAN_FRANCISCO,
        }
    }
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            camera_sphere_radius: 3.1,
            bridge_sphere_radius: 3.01,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            spacing: 0.338,
            start_offset: 0.15,
            min_path_samples: 20,
            max_path_samples: 50,
            km_per_sample: 200.0,
            max_scale: 0.15,
            scale_distance_km: 20_000.0,
            model_scale: [0.515, 1.0, 1.4],
            surface_lift: 0.01,
            drop_height: 10.0,
            drop_duration_ms: 2_000,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            path_samples: 50,
            progress_smoothing: 0.1,
            target_blend: 0.05,
            position_blend: 0.008,
            controls_blend_scale: 1.5,
            offset_direction: Vec3::new(0.2, 0.2, 0.4),
            offset_distance: 3.0,
            initial_position: Vec3::new(1.0, 1.0, 5.7),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            button_cooldown_ms: 450,
            wheel_cooldown_ms: 1_000,
            wheel_min_delta: 2.0,
            transition_ms: 450,
            default_milestones: 6,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 180,
            initial_step_delay_ms: 160,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "I/O error: {err}"),
            ConfigError::Parse(err) => write!(f, "config parse error: {err}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl JourneyConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let payload = fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&payload)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: JourneyConfig = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let reference = self.reference_city.location;
        GeoPoint::validated(reference.latitude, reference.longitude)
            .map_err(|e| ConfigError::Invalid(format!("reference_city: {e}")))?;

        positive("globe.camera_sphere_radius", self.globe.camera_sphere_radius)?;
        positive("globe.bridge_sphere_radius", self.globe.bridge_sphere_radius)?;

        let bridge = &self.bridge;
        positive("bridge.spacing", bridge.spacing)?;
        positive("bridge.km_per_sample", bridge.km_per_sample)?;
        positive("bridge.scale_distance_km", bridge.scale_distance_km)?;
        if bridge.start_offset < 0.0 || !bridge.start_offset.is_finite() {
            return Err(invalid("bridge.start_offset must be >= 0"));
        }
        if bridge.min_path_samples == 0 || bridge.min_path_samples > bridge.max_path_samples {
            return Err(invalid(
                "bridge path samples must satisfy 1 <= min_path_samples <= max_path_samples",
            ));
        }

        let camera = &self.camera;
        if camera.path_samples == 0 {
            return Err(invalid("camera.path_samples must be >= 1"));
        }
        unit_blend("camera.progress_smoothing", camera.progress_smoothing)?;
        unit_blend("camera.target_blend", camera.target_blend)?;
        unit_blend("camera.position_blend", camera.position_blend)?;
        unit_blend(
            "camera.position_blend * controls_blend_scale",
            camera.position_blend * camera.controls_blend_scale,
        )?;

        if self.navigation.default_milestones == 0 {
            return Err(invalid("navigation.default_milestones must be >= 1"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be a positive number, got {value}")))
    }
}

// Blend factors outside (0, 1] either never move or overshoot.
fn unit_blend(name: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in (0, 1], got {value}")))
    }
}

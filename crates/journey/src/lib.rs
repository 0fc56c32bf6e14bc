//! Bridge-building journey across a 3D globe.
//!
//! Great-circle paths between a home city and a fixed reference city, bridge
//! segments laid along them, and a camera that follows the build as the user
//! steps through milestones.

pub mod bridge;
pub mod camera;
pub mod config;
pub mod navigation;
pub mod path;
pub mod placement;
pub mod progress;
pub mod view;

pub use bridge::{
    BridgePlanner, BridgeSegment, SegmentTransform, compute_max_segments, compute_segment,
};
pub use camera::{CameraFollower, CameraRig, FollowInput, FollowState, FrameOutcome, SimpleRig};
pub use config::{ConfigError, JourneyConfig, SAN_FRANCISCO};
pub use navigation::{MilestoneNavigator, planned_bridge_count};
pub use path::GeodesicPath;
pub use placement::{BridgePlacement, PlacementCue};
pub use progress::{ProgressSignal, compute_progress};
pub use view::{City, JourneyEvent, JourneyView, VisibleSegment};

use foundation::math::{GeoPoint, Vec3, display_distance_km};
use foundation::time::Millis;
use journey::bridge::BRIDGE_SPHERE_RADIUS;
use journey::config::BridgeConfig;
use journey::{
    City, FollowState, FrameOutcome, GeodesicPath, JourneyConfig, JourneyEvent, JourneyView,
    SAN_FRANCISCO, SimpleRig, compute_max_segments, compute_segment,
};
use runtime::Frame;

const TOKYO: GeoPoint = GeoPoint::new(35.6762, 139.6503);

#[test]
fn route_capacity_is_deterministic() {
    let config = BridgeConfig::default();
    let path = GeodesicPath::adaptive(TOKYO, SAN_FRANCISCO, &config);
    assert_eq!(path.len(), 42);
    assert_eq!(path.start(), Some(TOKYO));
    assert_eq!(path.end(), Some(SAN_FRANCISCO));

    let n = compute_max_segments(&path, config.spacing, config.start_offset);
    assert_eq!(n, 12);
    let again = GeodesicPath::adaptive(TOKYO, SAN_FRANCISCO, &config);
    assert_eq!(compute_max_segments(&again, config.spacing, config.start_offset), n);

    let last = compute_segment(
        &path,
        n - 1,
        config.spacing,
        config.start_offset,
        path.distance_km(),
    )
    .expect("route has extent");
    let norm = last.position.length();
    assert!((norm - BRIDGE_SPHERE_RADIUS).abs() < 1e-3, "norm {norm}");
    assert_eq!(display_distance_km(TOKYO, SAN_FRANCISCO), 8274);
}

#[test]
fn full_journey_drives_camera_to_san_francisco() {
    let mut view = JourneyView::new(JourneyConfig::default(), 6);
    let mut rig = SimpleRig::new(Vec3::new(1.0, 1.0, 5.7));
    view.set_home(City::new("Tokyo", TOKYO), Millis(0));
    view.start();

    let mut frame = Frame::fixed(0, 1.0 / 60.0);
    let mut moved = 0;
    for _ in 0..3_000 {
        if frame.index > 0 && frame.index % 60 == 0 {
            view.on_wheel(50.0, frame.now);
        }
        if view.frame(frame, Some(&mut rig)) == FrameOutcome::Moved {
            moved += 1;
        }
        frame = frame.next();
    }

    assert_eq!(moved, 3_000);
    assert_eq!(view.navigator().index(), 5);
    assert_eq!(view.segment_count(), 12);
    assert_eq!(view.follower().state(), FollowState::Following);
    assert_eq!(view.distance_label().as_deref(), Some("8274 km"));

    // The camera settles near the oblique offset above the reference city.
    let surface = foundation::math::to_vector3(SAN_FRANCISCO, 3.1);
    assert!(rig.look_at.distance(surface) < 0.05, "{:?}", rig.look_at);

    let placed = view
        .events()
        .drain()
        .into_iter()
        .filter(|e| matches!(e.kind, JourneyEvent::BridgePlaced { .. }))
        .count();
    assert_eq!(placed, 12);
}

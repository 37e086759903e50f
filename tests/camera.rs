#![cfg(not(target_arch = "wasm32"))]

use curved_hud::camera::{ease_out_power4, fov_degrees, CameraConfig, CameraRig, Rotation};

#[test]
fn fov_frames_the_viewport() {
    let fov = fov_degrees(1000.0, 1000.0);
    assert!((fov - 53.130_102_354).abs() < 1e-6, "{fov}");
    // tan(fov/2) == h/2/d exactly.
    let half = (fov / 2.0).to_radians();
    assert!((half.tan() - 0.5).abs() < 1e-12);
}

#[test]
fn halving_distance_doubles_the_half_angle_tangent() {
    let near = fov_degrees(1000.0, 500.0);
    let far = fov_degrees(1000.0, 1000.0);
    assert!((near - 90.0).abs() < 1e-9);
    let ratio = (near / 2.0).to_radians().tan() / (far / 2.0).to_radians().tan();
    assert!((ratio - 2.0).abs() < 1e-12);
}

#[test]
fn easing_hits_endpoints_and_decelerates() {
    assert_eq!(ease_out_power4(0.0), 0.0);
    assert_eq!(ease_out_power4(1.0), 1.0);
    assert_eq!(ease_out_power4(2.0), 1.0);
    assert!((ease_out_power4(0.5) - (1.0 - 0.5f64.powi(5))).abs() < 1e-12);
    // More progress in the first quarter than in the last.
    let early = ease_out_power4(0.25) - ease_out_power4(0.0);
    let late = ease_out_power4(1.0) - ease_out_power4(0.75);
    assert!(early > late);
}

#[test]
fn transition_reaches_target_after_duration() {
    let mut cam = CameraRig::new(CameraConfig::default(), 1000.0, 1000.0);
    let target = cam.target_for(0.5, -0.25);
    assert_eq!(target, Rotation { x: 0.125, y: -0.25 });

    cam.transition_to(target, 10.0);
    cam.advance(12.0);
    let mid = cam.rotation();
    assert!(mid.y < 0.0 && mid.y > target.y);

    cam.advance(14.0);
    assert_eq!(cam.rotation(), target);
    assert!(cam.tween().is_none());
}

#[test]
fn retargeting_starts_from_current_rotation() {
    let mut cam = CameraRig::new(CameraConfig::default(), 1000.0, 1000.0);
    cam.transition_to(Rotation { x: 0.2, y: 0.2 }, 0.0);
    cam.advance(1.0);
    let current = cam.rotation();

    cam.transition_to(Rotation { x: -0.2, y: 0.0 }, 1.0);
    let tween = cam.tween().copied().unwrap();
    assert_eq!(tween.from, current);
    assert_eq!(tween.started_at_secs, 1.0);
    assert_eq!(tween.duration_secs, 4.0);
}

#[test]
fn resize_reframes_projection() {
    let mut cam = CameraRig::new(CameraConfig::default(), 1600.0, 1000.0);
    assert!((cam.projection().aspect - 1.6).abs() < 1e-12);

    cam.resize(800.0, 500.0);
    let p = cam.projection();
    assert!((p.aspect - 1.6).abs() < 1e-12);
    assert!((p.fov_degrees - fov_degrees(500.0, 1000.0)).abs() < 1e-12);
    assert_eq!((p.near, p.far), (1.0, 1500.0));
}

// Host-side tests for the per-frame animation step.

use glam::Vec2;
use std::time::Duration;
use trackside_core::constants::*;
use trackside_core::*;

const DT: f32 = 1.0 / 60.0;

fn run(mut s: AnimationState, frames: usize) -> AnimationState {
    for _ in 0..frames {
        s = advance(&s, DT);
    }
    s
}

#[test]
fn advance_is_pure() {
    let s = AnimationState::new(false);
    let a = advance(&s, DT);
    let b = advance(&s, DT);
    assert_eq!(a, b);
    assert_eq!(s.elapsed, 0.0);
    assert!((a.elapsed - DT).abs() < 1e-7);
}

#[test]
fn pointer_leave_decays_monotonically_to_neutral() {
    let mut s = AnimationState::new(false);
    s.set_pointer_target(Vec2::new(1.0, -1.0));
    s = run(s, 240);
    assert!((s.pointer - Vec2::new(1.0, -1.0)).length() < 1e-3);

    s.clear_pointer_target();
    assert_eq!(s.pointer_target, Vec2::ZERO);
    let mut prev = s.pointer.length();
    for _ in 0..300 {
        s = advance(&s, DT);
        let len = s.pointer.length();
        assert!(len <= prev, "pointer moved away from neutral");
        assert!(s.pointer.x >= 0.0 && s.pointer.y <= 0.0, "overshoot past neutral");
        prev = len;
    }
    assert!(prev < 1e-4);
}

#[test]
fn smoothing_never_overshoots_on_long_frames() {
    let mut s = AnimationState::new(false);
    s.set_pointer_target(Vec2::new(0.5, 0.5));
    for dt in [0.5, 1.0, 10.0, f32::INFINITY] {
        s = advance(&s, dt);
        assert!(s.pointer.x <= 0.5 && s.pointer.y <= 0.5);
    }
}

#[test]
fn pointer_target_is_clamped() {
    let mut s = AnimationState::new(false);
    s.set_pointer_target(Vec2::new(3.0, -7.0));
    assert_eq!(s.pointer_target, Vec2::new(1.0, -1.0));
}

#[test]
fn frame_delta_is_clamped() {
    let s = advance(&AnimationState::new(false), 5.0);
    assert_eq!(s.elapsed, MAX_FRAME_DT_SEC);
    let s = advance(&s, -1.0);
    assert_eq!(s.elapsed, MAX_FRAME_DT_SEC);
}

#[test]
fn reduced_motion_freezes_idle_motion_only() {
    let layout = SceneLayout::default();
    let mut s = AnimationState::new(true);
    s.set_pointer_target(Vec2::new(1.0, 0.0));
    s = run(s, 90);
    assert_eq!(s.ring_spin, [0.0; 3]);

    let frame = SceneFrame::from_state(&s, &layout);
    assert_eq!(frame.ring_opacity, [RING_BASE_OPACITY; 3]);
    for (i, y) in frame.node_heights.iter().enumerate() {
        assert_eq!(*y, layout.nodes[i].y);
    }
    // pointer still drives the camera
    assert!(frame.camera_eye.x > 4.0);
    // bars keep animating
    let later = SceneFrame::from_state(&run(s.clone(), 10), &layout);
    assert_ne!(frame.bar_levels, later.bar_levels);
}

#[test]
fn rings_spin_faster_further_out() {
    let s = run(AnimationState::new(false), 60);
    assert!(s.ring_spin[0] > 0.0);
    assert!(s.ring_spin[1] > s.ring_spin[0]);
    assert!(s.ring_spin[2] > s.ring_spin[1]);
    // one second at the reference rate
    assert!((s.ring_spin[0] - RING_SPIN_BASE_PER_FRAME * 60.0).abs() < 1e-4);
}

#[test]
fn bar_levels_stay_in_range() {
    let layout = SceneLayout::default();
    let mut s = AnimationState::new(false);
    for _ in 0..600 {
        s = advance(&s, DT);
        let f = SceneFrame::from_state(&s, &layout);
        for level in f.bar_levels {
            assert!((0.26 - 1e-4..=1.04 + 1e-4).contains(&level));
        }
    }
}

#[test]
fn wave_is_sum_of_two_sinusoids() {
    let t = 1.7f32;
    let i = 10usize;
    let expected = -8.0 + (t * 2.8 + 2.4).sin() * 4.6 + (t * 1.14 + 1.2).cos() * 1.9;
    assert!((wave_height(t, i) - expected).abs() < 1e-4);
    for i in 0..WAVE_POINT_COUNT {
        let y = wave_height(t, i);
        assert!((-8.0 - 6.51..=-8.0 + 6.51).contains(&y));
    }
}

#[test]
fn marker_rides_the_wave() {
    let layout = SceneLayout::default();
    let s = run(AnimationState::new(false), 37);
    let f = SceneFrame::from_state(&s, &layout);
    assert!(f.marker_index < WAVE_POINT_COUNT);
    assert_eq!(f.marker_position(), f.wave[f.marker_index]);
    assert_eq!(f.marker_position().x, layout.wave[f.marker_index].x);
}

#[test]
fn hud_percentages_are_clamped() {
    let mut t = 0.0f32;
    while t < 30.0 {
        let hud = HudReadout::at(t);
        assert!((0.0..=100.0).contains(&hud.throttle_pct));
        assert!((0.0..=100.0).contains(&hud.brake_pct));
        assert!((146.0 - 25.0..=146.0 + 25.0).contains(&hud.speed_mph));
        assert!((0.88..=1.76).contains(&hud.lateral_g));
        t += 0.013;
    }
    // brake dips below zero around here and must read 0
    let floor = (0..3000)
        .map(|k| HudReadout::at(k as f32 * 0.01).brake_pct)
        .fold(f32::MAX, f32::min);
    assert_eq!(floor, 0.0);
}

#[test]
fn hud_refresh_counts_match_cadence() {
    let mut s = AnimationState::new(false);
    let mut refreshes = 0;
    for _ in 0..600 {
        s = advance(&s, DT);
        if s.hud_refreshed {
            refreshes += 1;
        }
    }
    // ten seconds at roughly one refresh per six frames
    assert!((95..=110).contains(&refreshes), "{}", refreshes);
}

#[test]
fn camera_sways_with_pointer() {
    let layout = SceneLayout::default();
    let mut s = AnimationState::new(false);
    s.pointer = Vec2::new(1.0, 1.0);
    let f = SceneFrame::from_state(&s, &layout);
    assert!((f.camera_eye.x - CAMERA_POINTER_SWAY_X).abs() < 1e-5);
    assert!((f.camera_eye.y - (44.0 + CAMERA_POINTER_SWAY_Y)).abs() < 1e-5);
    assert_eq!(f.camera_eye.z, 128.0);
}

#[test]
fn frame_clock_starts_at_zero() {
    let start = instant::Instant::now();
    let mut clock = FrameClock::default();
    assert_eq!(clock.tick(start), 0.0);
    let dt = clock.tick(start + Duration::from_millis(16));
    assert!((dt - 0.016).abs() < 1e-4);
    // a clock that goes backwards never yields a negative delta
    assert_eq!(clock.tick(start), 0.0);

    let s = advance(&AnimationState::new(false), FrameClock::default().tick(start));
    assert_eq!(s.elapsed, 0.0);
    assert!(!s.hud_refreshed);
}

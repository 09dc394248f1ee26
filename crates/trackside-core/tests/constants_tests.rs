// Host-side tests for constants and their relationships.

use trackside_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn timing_constants_are_positive() {
    assert!(HUD_REFRESH_SEC > 0.0);
    assert!(MAX_FRAME_DT_SEC > HUD_REFRESH_SEC);
    assert!(REFERENCE_FPS > 0.0);
    assert!(MARKER_POINTS_PER_SEC > 0.0);
    assert!(SETTLE_DELAY_MS > NAVIGATE_DELAY_MS);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn smoothing_factor_is_a_fraction() {
    assert!(POINTER_SMOOTHING_PER_FRAME > 0.0 && POINTER_SMOOTHING_PER_FRAME < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn scene_fits_inside_fog_and_clip_range() {
    assert!(FOG_NEAR < FOG_FAR);
    assert!(CAMERA_NEAR > 0.0 && CAMERA_FAR > FOG_FAR);
    assert!(GROUND_Y < GRID_Y);
    assert!(BAR_BASE_Y > GROUND_Y);
    assert!(RING_RADII.windows(2).all(|w| w[0] < w[1]));
    assert!(RING_RADII[RING_RADII.len() - 1] < GROUND_RADIUS);
}

#[test]
fn hex_colours_unpack() {
    assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
    assert_eq!(rgb(0x00ff80)[1], 1.0);
    let [r, g, b] = rgb(GROUND_COLOR);
    assert!(r < 0.1 && g < 0.1 && b < 0.2);
}

#[test]
fn fallback_copy_names_the_missing_backend() {
    assert_eq!(FALLBACK_EYEBROW, "Telemetry Preview");
    assert!(FALLBACK_TITLE.contains("WebGPU"));
    assert!(FALLBACK_HINT.starts_with("Enable hardware acceleration"));
}

//! Per-frame procedural animation, kept free of any graphics backend.
//!
//! [`advance`] maps an [`AnimationState`] and a frame delta to the next state;
//! [`SceneFrame::from_state`] derives everything the renderer needs from it.

use crate::constants::*;
use crate::scene::SceneLayout;
use glam::{Vec2, Vec3};
use instant::Instant;

/// Measures frame deltas. The first tick reports zero so start-up time is not
/// counted as animation time.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(last) if now > last => (now - last).as_secs_f32(),
            _ => 0.0,
        };
        self.last = Some(now);
        dt
    }
}

/// Derived telemetry readout shown over the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudReadout {
    pub speed_mph: f32,
    pub throttle_pct: f32,
    pub brake_pct: f32,
    pub lateral_g: f32,
}

impl Default for HudReadout {
    fn default() -> Self {
        Self {
            speed_mph: HUD_INITIAL_SPEED_MPH,
            throttle_pct: HUD_INITIAL_THROTTLE_PCT,
            brake_pct: HUD_INITIAL_BRAKE_PCT,
            lateral_g: HUD_INITIAL_LATERAL_G,
        }
    }
}

impl HudReadout {
    /// Closed-form readout at `t` seconds; percentages clamped to 0..=100.
    pub fn at(t: f32) -> Self {
        let speed = 146.0 + (t * 1.35).sin() * 18.0 + (t * 0.43).sin() * 7.0;
        let throttle = 64.0 + (t * 2.3 + 0.35).sin() * 31.0;
        let brake = 22.0 + (t * 1.7 + 2.2).sin() * 28.0;
        let lateral = 1.32 + (t * 1.45 + 0.9).sin() * 0.43;
        Self {
            speed_mph: speed,
            throttle_pct: throttle.clamp(0.0, 100.0),
            brake_pct: brake.clamp(0.0, 100.0),
            lateral_g: lateral,
        }
    }

    pub fn speed_text(&self) -> String {
        format!("{}", self.speed_mph.round() as i32)
    }

    pub fn throttle_text(&self) -> String {
        format!("{}%", self.throttle_pct.round() as i32)
    }

    pub fn brake_text(&self) -> String {
        format!("{}%", self.brake_pct.round() as i32)
    }

    pub fn lateral_text(&self) -> String {
        format!("{:.2}g", self.lateral_g)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationState {
    pub elapsed: f32,
    /// Smoothed pointer offset in [-1, 1]².
    pub pointer: Vec2,
    pub pointer_target: Vec2,
    pub ring_spin: [f32; RING_RADII.len()],
    pub hud: HudReadout,
    pub hud_accum: f32,
    /// Set by the step that refreshed `hud`.
    pub hud_refreshed: bool,
    pub reduced_motion: bool,
}

impl AnimationState {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            elapsed: 0.0,
            pointer: Vec2::ZERO,
            pointer_target: Vec2::ZERO,
            ring_spin: [0.0; RING_RADII.len()],
            hud: HudReadout::default(),
            hud_accum: 0.0,
            hud_refreshed: false,
            reduced_motion,
        }
    }

    pub fn set_pointer_target(&mut self, target: Vec2) {
        self.pointer_target = target.clamp(Vec2::splat(-1.0), Vec2::ONE);
    }

    pub fn clear_pointer_target(&mut self) {
        self.pointer_target = Vec2::ZERO;
    }
}

/// Fraction of the remaining pointer distance covered in `dt` seconds.
///
/// Equals the per-frame factor at the reference rate and stays within [0, 1],
/// so smoothing never overshoots the target.
#[inline]
pub fn pointer_smoothing_alpha(dt: f32) -> f32 {
    let frames = dt.max(0.0) * REFERENCE_FPS;
    (1.0 - (1.0 - POINTER_SMOOTHING_PER_FRAME).powf(frames)).clamp(0.0, 1.0)
}

/// Next animation state after `dt` seconds. Negative or huge deltas are clamped.
pub fn advance(state: &AnimationState, dt: f32) -> AnimationState {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT_SEC)
    } else {
        0.0
    };
    let mut next = state.clone();
    next.elapsed += dt;

    let alpha = pointer_smoothing_alpha(dt);
    next.pointer += (next.pointer_target - next.pointer) * alpha;

    if !next.reduced_motion {
        let frames = dt * REFERENCE_FPS;
        for (i, spin) in next.ring_spin.iter_mut().enumerate() {
            *spin += (RING_SPIN_BASE_PER_FRAME + i as f32 * RING_SPIN_STEP_PER_FRAME) * frames;
        }
    }

    next.hud_accum += dt;
    next.hud_refreshed = false;
    if next.hud_accum > HUD_REFRESH_SEC {
        next.hud = HudReadout::at(next.elapsed);
        next.hud_accum = 0.0;
        next.hud_refreshed = true;
    }
    next
}

/// Everything the renderer applies for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneFrame {
    pub bar_levels: [f32; BAR_COUNT],
    pub ring_spin: [f32; RING_RADII.len()],
    pub ring_opacity: [f32; RING_RADII.len()],
    pub node_heights: [f32; NODE_COUNT],
    pub wave: [Vec3; WAVE_POINT_COUNT],
    pub marker_index: usize,
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
}

impl SceneFrame {
    pub fn from_state(state: &AnimationState, layout: &SceneLayout) -> Self {
        let t = state.elapsed;
        let bar_levels = std::array::from_fn(|i| bar_level(t, i));
        let ring_opacity = std::array::from_fn(|i| {
            if state.reduced_motion {
                RING_BASE_OPACITY
            } else {
                0.2 + (t * 1.3 + i as f32).sin() * 0.08
            }
        });
        let node_heights = std::array::from_fn(|i| {
            if state.reduced_motion {
                layout.nodes[i].y
            } else {
                NODE_BASE_Y + (t * 2.0 + i as f32).sin() * 0.9
            }
        });
        let wave = std::array::from_fn(|i| {
            let p = layout.wave[i];
            Vec3::new(p.x, wave_height(t, i), p.z)
        });
        let base = Vec3::from(CAMERA_BASE_EYE);
        Self {
            bar_levels,
            ring_spin: state.ring_spin,
            ring_opacity,
            node_heights,
            wave,
            marker_index: marker_index(t),
            camera_eye: Vec3::new(
                state.pointer.x * CAMERA_POINTER_SWAY_X,
                base.y + state.pointer.y * CAMERA_POINTER_SWAY_Y,
                base.z,
            ),
            camera_target: Vec3::from(CAMERA_TARGET),
        }
    }

    pub fn marker_position(&self) -> Vec3 {
        self.wave[self.marker_index]
    }
}

/// Bar height as a fraction of full height.
#[inline]
pub fn bar_level(t: f32, index: usize) -> f32 {
    0.26 + ((t * 2.5 + index as f32 * 0.58).sin() * 0.5 + 0.5) * 0.78
}

/// Vertical position of wave point `index`: two travelling sinusoids.
#[inline]
pub fn wave_height(t: f32, index: usize) -> f32 {
    let i = index as f32;
    WAVE_BASE_Y + (t * 2.8 + i * 0.24).sin() * 4.6 + (t * 1.14 + i * 0.12).cos() * 1.9
}

/// Wave point the marker sits on; travels at a fixed rate and wraps.
#[inline]
pub fn marker_index(t: f32) -> usize {
    let idx = (t.max(0.0) * MARKER_POINTS_PER_SEC).rem_euclid(WAVE_POINT_COUNT as f32) as usize;
    idx.min(WAVE_POINT_COUNT - 1)
}

/// Element-relative bounds in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a client-space pointer position to [-1, 1] on both axes relative to `bounds`.
/// Returns `None` for an empty box.
#[inline]
pub fn normalize_pointer(client_x: f64, client_y: f64, bounds: Bounds) -> Option<Vec2> {
    if !(bounds.width > 0.0 && bounds.height > 0.0) {
        return None;
    }
    let x = ((client_x - bounds.left) / bounds.width - 0.5) * 2.0;
    let y = ((client_y - bounds.top) / bounds.height - 0.5) * 2.0;
    let v = Vec2::new(x as f32, y as f32);
    v.is_finite().then(|| v.clamp(Vec2::splat(-1.0), Vec2::ONE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_refreshes_on_cadence() {
        let mut s = AnimationState::new(false);
        s = advance(&s, 0.05);
        assert!(!s.hud_refreshed);
        assert_eq!(s.hud, HudReadout::default());
        s = advance(&s, 0.05);
        assert!(s.hud_refreshed);
        assert_eq!(s.hud, HudReadout::at(s.elapsed));
        assert_eq!(s.hud_accum, 0.0);
    }

    #[test]
    fn hud_text_formats() {
        let hud = HudReadout::default();
        assert_eq!(hud.speed_text(), "149");
        assert_eq!(hud.throttle_text(), "67%");
        assert_eq!(hud.brake_text(), "19%");
        assert_eq!(hud.lateral_text(), "1.34g");
    }

    #[test]
    fn smoothing_alpha_matches_reference_frame() {
        let a = pointer_smoothing_alpha(1.0 / 60.0);
        assert!((a - POINTER_SMOOTHING_PER_FRAME).abs() < 1e-4);
        assert_eq!(pointer_smoothing_alpha(0.0), 0.0);
    }

    #[test]
    fn marker_wraps_after_full_lap() {
        assert_eq!(marker_index(0.0), 0);
        assert_eq!(marker_index(1.0), 24);
        assert_eq!(marker_index(84.0 / 24.0 + 0.01), 0);
    }

    #[test]
    fn pointer_normalisation_is_container_relative() {
        let b = Bounds {
            left: 100.0,
            top: 50.0,
            width: 200.0,
            height: 100.0,
        };
        assert_eq!(normalize_pointer(200.0, 100.0, b), Some(Vec2::ZERO));
        assert_eq!(normalize_pointer(100.0, 50.0, b), Some(Vec2::new(-1.0, -1.0)));
        assert_eq!(normalize_pointer(300.0, 150.0, b), Some(Vec2::ONE));
        let empty = Bounds { width: 0.0, ..b };
        assert_eq!(normalize_pointer(1.0, 1.0, empty), None);
    }
}

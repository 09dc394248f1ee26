// Scene, animation and timing constants shared by the core and the web frontend.

// Camera
pub const CAMERA_FOVY_DEG: f32 = 42.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 900.0;
pub const CAMERA_BASE_EYE: [f32; 3] = [0.0, 44.0, 128.0];
pub const CAMERA_TARGET: [f32; 3] = [0.0, -3.0, 0.0];
pub const CAMERA_POINTER_SWAY_X: f32 = 5.4; // world units at full pointer deflection
pub const CAMERA_POINTER_SWAY_Y: f32 = -2.6;

// Viewport
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Fog
pub const FOG_COLOR: u32 = 0x040914;
pub const FOG_NEAR: f32 = 120.0;
pub const FOG_FAR: f32 = 320.0;

// Ground disc and grid
pub const GROUND_RADIUS: f32 = 120.0;
pub const GROUND_SEGMENTS: u32 = 64;
pub const GROUND_Y: f32 = -18.0;
pub const GROUND_COLOR: u32 = 0x08172a;
pub const GRID_SIZE: f32 = 230.0;
pub const GRID_DIVISIONS: u32 = 26;
pub const GRID_Y: f32 = -17.9;
pub const GRID_CENTER_COLOR: u32 = 0x2f6ca4;
pub const GRID_LINE_COLOR: u32 = 0x1c3d60;
pub const GRID_OPACITY: f32 = 0.3;

// Telemetry bars
pub const BAR_COUNT: usize = 10;
pub const BAR_WIDTH: f32 = 2.35;
pub const BAR_HEIGHT: f32 = 14.0;
pub const BAR_START_X: f32 = -31.0;
pub const BAR_SPACING: f32 = 6.9;
pub const BAR_BASE_Y: f32 = -11.0;
pub const BAR_Z: f32 = -17.5;
pub const BAR_COLOR: u32 = 0x6ec6ff;
pub const BAR_EMISSIVE: u32 = 0x3ea6ff;
pub const BAR_EMISSIVE_INTENSITY: f32 = 0.48;

// Rings
pub const RING_RADII: [f32; 3] = [20.0, 30.0, 42.0];
pub const RING_SEGMENTS: u32 = 120;
pub const RING_Y: f32 = -6.0;
pub const RING_COLORS: [u32; 2] = [0x8fd4ff, 0xf0d9a5];
pub const RING_BASE_OPACITY: f32 = 0.28;

// Data nodes
pub const NODE_COUNT: usize = 16;
pub const NODE_RADIUS: f32 = 0.9;
pub const NODE_BASE_Y: f32 = -9.0;
pub const NODE_COLOR: u32 = 0x7fcfff;
pub const NODE_EMISSIVE: u32 = 0x2d7cb3;
pub const NODE_EMISSIVE_INTENSITY: f32 = 0.4;

// Wave line and path marker
pub const WAVE_POINT_COUNT: usize = 84;
pub const WAVE_START_X: f32 = -70.0;
pub const WAVE_SPACING: f32 = 1.68;
pub const WAVE_BASE_Y: f32 = -8.0;
pub const WAVE_Z: f32 = -30.0;
pub const WAVE_COLOR: u32 = 0x9cdcff;
pub const WAVE_OPACITY: f32 = 0.95;
pub const MARKER_RADIUS: f32 = 1.35;
pub const MARKER_COLOR: u32 = 0xf0d9a5;
pub const MARKER_EMISSIVE: u32 = 0x8d6c30;
pub const MARKER_EMISSIVE_INTENSITY: f32 = 0.75;
pub const MARKER_POINTS_PER_SEC: f32 = 24.0;

// Lights
pub const AMBIENT_COLOR: u32 = 0x79c7ff;
pub const AMBIENT_INTENSITY: f32 = 0.42;
pub const KEY_LIGHT_COLOR: u32 = 0x4daefc;
pub const KEY_LIGHT_INTENSITY: f32 = 1.24;
pub const KEY_LIGHT_RANGE: f32 = 320.0;
pub const KEY_LIGHT_POSITION: [f32; 3] = [52.0, 70.0, 48.0];
pub const FILL_LIGHT_COLOR: u32 = 0xf0d9a5;
pub const FILL_LIGHT_INTENSITY: f32 = 0.84;
pub const FILL_LIGHT_RANGE: f32 = 280.0;
pub const FILL_LIGHT_POSITION: [f32; 3] = [-72.0, 36.0, -62.0];
pub const RIM_LIGHT_COLOR: u32 = 0x7fd0ff;
pub const RIM_LIGHT_INTENSITY: f32 = 0.56;
pub const RIM_LIGHT_POSITION: [f32; 3] = [0.0, 60.0, -130.0];

// Frame stepping
pub const REFERENCE_FPS: f32 = 60.0; // per-frame coefficients below are tuned at this rate
pub const MAX_FRAME_DT_SEC: f32 = 0.25;
pub const POINTER_SMOOTHING_PER_FRAME: f32 = 0.08;
pub const RING_SPIN_BASE_PER_FRAME: f32 = 0.0012; // radians
pub const RING_SPIN_STEP_PER_FRAME: f32 = 0.0004; // extra radians per ring index

// HUD
pub const HUD_REFRESH_SEC: f32 = 0.09;
pub const HUD_INITIAL_SPEED_MPH: f32 = 149.0;
pub const HUD_INITIAL_THROTTLE_PCT: f32 = 67.0;
pub const HUD_INITIAL_BRAKE_PCT: f32 = 19.0;
pub const HUD_INITIAL_LATERAL_G: f32 = 1.34;

// Static fallback panel shown without WebGPU
pub const FALLBACK_EYEBROW: &str = "Telemetry Preview";
pub const FALLBACK_TITLE: &str = "WebGPU not available";
pub const FALLBACK_HINT: &str = "Enable hardware acceleration to view 3D animation";

// Page transitions
pub const NAVIGATE_DELAY_MS: u64 = 420;
pub const SETTLE_DELAY_MS: u64 = 680;

#[inline]
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

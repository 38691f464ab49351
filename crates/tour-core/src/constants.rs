use std::f32::consts::FRAC_PI_2;

// Shared geometry/interaction tuning constants used by the core and the web frontend.

// Panorama sphere
pub const PANORAMA_RADIUS: f32 = 500.0; // every hotspot sits at this distance from the eye
pub const PANORAMA_WIDTH_SEGMENTS: u32 = 60;
pub const PANORAMA_HEIGHT_SEGMENTS: u32 = 40;

// Hotspot markers
pub const MARKER_RADIUS: f32 = 10.0; // also the ray-sphere radius for picking
pub const MARKER_SEGMENTS: u32 = 32;
pub const MARKER_OPACITY: f32 = 0.8;
pub const LINKED_MARKER_COLOR: [f32; 3] = [0.30, 0.85, 0.45]; // green-ish
pub const UNLINKED_MARKER_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Look-around
pub const LOOK_SENSITIVITY: f32 = 0.005; // radians per pixel of drag
pub const PITCH_LIMIT: f32 = FRAC_PI_2;
pub const CLICK_DRAG_TOLERANCE_PX: f32 = 4.0; // larger pointer travel is a drag, not a click

// Crossfade
pub const TRANSITION_STEP: f32 = 0.02; // progress per display refresh (~50 frames)

// Camera
pub const CAMERA_FOV_Y_DEG: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

pub const DEFAULT_HOTSPOT_TITLE: &str = "New Hotspot";

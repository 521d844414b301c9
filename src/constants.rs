/// Seconds to Z units: one hour of timetable spans one unit, comparable to
/// the spatial extent of the generated networks.
pub const TIME_SCALE: f64 = 1.0 / 3600.0;

/// Infrastructure copies drawn at z = 0, 1, .. as hour reference planes
pub const DEFAULT_HOUR_LAYERS: u32 = 5;

/// Each layer redraws the whole infrastructure every frame
pub const MAX_HOUR_LAYERS: u32 = 48;

pub const DEFAULT_INFRASTRUCTURE_URL: &str = "data/i1.json";
pub const DEFAULT_TIMETABLE_URL: &str = "data/tt1.json";

/// Initial camera placement, looking down the time axis
pub const CAMERA_DISTANCE: f32 = 500.0;
pub const CAMERA_OFFSET_X: f32 = 5.0;
pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 10_000.0;

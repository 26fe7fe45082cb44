use serde::{Deserialize, Serialize};

pub mod payload;

pub use payload::{encode_points, parse_points, ParseError};

/// Number of markers that outline a zone
pub const ZONE_POINT_COUNT: usize = 4;

/// Added to every downloaded y-coordinate: the remote points are recorded at
/// robot height, the local viewer stands about 1.5 m higher.
pub const DOWNLOAD_Y_OFFSET: f64 = -1.5;

/// Default y of the wall bottom rim
pub const DEFAULT_WALL_HEIGHT: f64 = -0.12;

/// Vertical drop from a marker to its shadow
pub const SHADOW_DROP: f64 = 0.12;

/// A placed or downloaded anchor position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Same point with `y` replaced
    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }

    /// Same point shifted vertically by `dy`
    pub fn offset_y(self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise comparison with an absolute tolerance
    pub fn approx_eq(&self, other: &Point3, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Point3> for [f64; 3] {
    fn from(p: Point3) -> Self {
        p.to_array()
    }
}

/// Which flow a session runs. Chosen once at session start from the host's
/// scene name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Collect four markers locally and publish them
    #[default]
    Placement,
    /// Collect, publish, then show the walls
    Feedback,
    /// Download a published zone and show its walls
    RemoteFeedback,
}

impl SessionMode {
    /// Map a host scene name onto a mode
    pub fn from_scene_name(name: &str) -> Self {
        match name {
            "PhysicalFeedback" => SessionMode::RemoteFeedback,
            "Feedback" => SessionMode::Feedback,
            _ => SessionMode::Placement,
        }
    }

    /// Scene name that selects this mode
    pub fn scene_name(&self) -> &'static str {
        match self {
            SessionMode::Placement => "Placement",
            SessionMode::Feedback => "Feedback",
            SessionMode::RemoteFeedback => "PhysicalFeedback",
        }
    }

    /// Points come from the remote store instead of placement events
    pub fn is_remote(&self) -> bool {
        matches!(self, SessionMode::RemoteFeedback)
    }

    /// Whether this mode ends with a wall mesh
    pub fn builds_walls(&self) -> bool {
        matches!(self, SessionMode::Feedback | SessionMode::RemoteFeedback)
    }
}

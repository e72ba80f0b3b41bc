//! `handwave-types` – shared data model.
//!
//! Everything that crosses a crate boundary lives here: the body-pose input
//! ([`PoseFrame`], [`SensorTick`]), screen geometry, the commands sent to the
//! desktop collaborator ([`DesktopIntent`]), recognized gestures
//! ([`GestureKind`], [`GestureEvent`]) and the workspace error type
//! ([`HandwaveError`]).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ────────────────────────────────────────────────────────────────────────────
// Skeleton
// ────────────────────────────────────────────────────────────────────────────

/// The tracked joints of a full-body skeleton.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum JointId {
    SpineBase,
    SpineMid,
    SpineShoulder,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    HandTipLeft,
    ThumbLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HandTipRight,
    ThumbRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
}

/// Body side, used to resolve per-arm joints and hand states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn hand(self) -> JointId {
        match self {
            Side::Left => JointId::HandLeft,
            Side::Right => JointId::HandRight,
        }
    }

    pub fn elbow(self) -> JointId {
        match self {
            Side::Left => JointId::ElbowLeft,
            Side::Right => JointId::ElbowRight,
        }
    }

    pub fn shoulder(self) -> JointId {
        match self {
            Side::Left => JointId::ShoulderLeft,
            Side::Right => JointId::ShoulderRight,
        }
    }

    pub fn hip(self) -> JointId {
        match self {
            Side::Left => JointId::HipLeft,
            Side::Right => JointId::HipRight,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = HandwaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(HandwaveError::Config(format!("unknown hand side '{other}'"))),
        }
    }
}

/// Hand shape reported by the sensor for one hand.
///
/// Only [`HandState::Open`], [`HandState::Closed`] and
/// [`HandState::Pointing`] can satisfy a hand-state predicate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum HandState {
    #[default]
    Unknown,
    NotTracked,
    Open,
    Closed,
    /// Index and middle finger extended ("lasso").
    Pointing,
}

/// A joint position in sensor space (metres).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A joint projected into 2D display space by the sensor collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pose input
// ────────────────────────────────────────────────────────────────────────────

/// One sampled instant of a single tracked body.
///
/// Produced once per sensor tick and consumed read-only by every gesture
/// matcher.  Joints the sensor did not report are simply absent; any
/// predicate reading an absent joint fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseFrame {
    #[serde(default = "default_tracked")]
    pub tracked: bool,
    /// Sensor-space joint positions.
    pub joints: BTreeMap<JointId, Point3>,
    /// Display-space projections, used for cursor and window deltas.
    #[serde(default)]
    pub projected: BTreeMap<JointId, ScreenPoint>,
    #[serde(default)]
    pub left_hand: HandState,
    #[serde(default)]
    pub right_hand: HandState,
}

fn default_tracked() -> bool {
    true
}

impl Default for PoseFrame {
    fn default() -> Self {
        Self {
            tracked: true,
            joints: BTreeMap::new(),
            projected: BTreeMap::new(),
            left_hand: HandState::Unknown,
            right_hand: HandState::Unknown,
        }
    }
}

impl PoseFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_joint(mut self, id: JointId, position: Point3) -> Self {
        self.joints.insert(id, position);
        self
    }

    pub fn with_projection(mut self, id: JointId, point: ScreenPoint) -> Self {
        self.projected.insert(id, point);
        self
    }

    pub fn with_hand_state(mut self, side: Side, state: HandState) -> Self {
        match side {
            Side::Left => self.left_hand = state,
            Side::Right => self.right_hand = state,
        }
        self
    }

    pub fn joint(&self, id: JointId) -> Option<Point3> {
        self.joints.get(&id).copied()
    }

    pub fn projected(&self, id: JointId) -> Option<ScreenPoint> {
        self.projected.get(&id).copied()
    }

    pub fn hand_state(&self, side: Side) -> HandState {
        match side {
            Side::Left => self.left_hand,
            Side::Right => self.right_hand,
        }
    }

    /// Distance between two joints, or `None` if either is missing.
    pub fn distance(&self, a: JointId, b: JointId) -> Option<f32> {
        Some(self.joint(a)?.distance(&self.joint(b)?))
    }

    /// Distance of the body from the sensor: spine-base depth, or the
    /// nearest reported joint when the spine base is missing.
    pub fn depth(&self) -> Option<f32> {
        self.joint(JointId::SpineBase).map(|p| p.z).or_else(|| {
            self.joints
                .values()
                .map(|p| p.z)
                .min_by(|a, b| a.total_cmp(b))
        })
    }
}

/// Everything the sensor reported for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SensorTick {
    #[serde(default)]
    pub bodies: Vec<PoseFrame>,
}

impl SensorTick {
    /// The tracked body closest to the sensor, if any.
    pub fn nearest_body(&self) -> Option<&PoseFrame> {
        self.bodies
            .iter()
            .filter(|b| b.tracked)
            .filter_map(|b| b.depth().map(|d| (d, b)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, body)| body)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Desktop geometry and intents
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Opaque handle of a top-level window owned by the desktop collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    Maximized,
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKey {
    PlayPause,
    VolumeUp,
    VolumeDown,
}

/// A command for the OS collaborator that moves the cursor, repositions
/// windows, or sends key events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "payload")]
pub enum DesktopIntent {
    /// Relative cursor move in screen pixels.
    MoveCursorBy { dx: i32, dy: i32 },
    /// Left button click at the current cursor position.
    Click,
    /// Move a window's top-left corner, keeping its size.
    MoveWindow { window: WindowId, x: i32, y: i32 },
    /// Move and resize a window.
    PlaceWindow { window: WindowId, rect: Rect },
    ShowWindow { window: WindowId, state: WindowState },
    /// One scroll line on the foreground window.
    Scroll(ScrollDirection),
    MediaKey(MediaKey),
    MinimizeAll,
    RestoreAll,
}

// ────────────────────────────────────────────────────────────────────────────
// Gestures
// ────────────────────────────────────────────────────────────────────────────

/// Every gesture type the engine can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Wave,
    WindowDragStart,
    WindowDragEnd,
    CursorStart,
    CursorEnd,
    ScrollUpStart,
    ScrollDownStart,
    ScrollEnd,
    VolumeUpStart,
    VolumeDownStart,
    VolumeEnd,
    PausePlay,
    HideAll,
    ShowAll,
    Knock,
    Slap,
    Poke,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wave => "wave",
            Self::WindowDragStart => "window-drag-start",
            Self::WindowDragEnd => "window-drag-end",
            Self::CursorStart => "cursor-start",
            Self::CursorEnd => "cursor-end",
            Self::ScrollUpStart => "scroll-up-start",
            Self::ScrollDownStart => "scroll-down-start",
            Self::ScrollEnd => "scroll-end",
            Self::VolumeUpStart => "volume-up-start",
            Self::VolumeDownStart => "volume-down-start",
            Self::VolumeEnd => "volume-end",
            Self::PausePlay => "pause-play",
            Self::HideAll => "hide-all",
            Self::ShowAll => "show-all",
            Self::Knock => "knock",
            Self::Slap => "slap",
            Self::Poke => "poke",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named gesture-completion event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: GestureKind,
    /// The hand that performed the gesture, when the gesture tracks one.
    pub hand: Option<Side>,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, hand: Option<Side>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            hand,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Workspace-wide error type.
///
/// The recognition and motion core never produces these for degenerate
/// poses; they come from the desktop collaborator and the outer surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandwaveError {
    #[error("Desktop call '{operation}' failed: {details}")]
    Desktop { operation: String, details: String },

    #[error("Unknown window: {0}")]
    UnknownWindow(WindowId),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("Channel Error: {0}")]
    Channel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(depth: f32) -> PoseFrame {
        PoseFrame::new().with_joint(JointId::SpineBase, Point3::new(0.0, 0.0, depth))
    }

    #[test]
    fn point_distance_is_euclidean() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert!((a.distance(&b) - 13.0).abs() < 1e-6);
    }

    #[test]
    fn side_resolves_joints() {
        assert_eq!(Side::Left.hand(), JointId::HandLeft);
        assert_eq!(Side::Right.elbow(), JointId::ElbowRight);
        assert_eq!(Side::Left.shoulder(), JointId::ShoulderLeft);
        assert_eq!(Side::Right.hip(), JointId::HipRight);
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!("Right".parse::<Side>().unwrap(), Side::Right);
        assert!("middle".parse::<Side>().is_err());
    }

    #[test]
    fn missing_joint_distance_is_none() {
        let frame = PoseFrame::new().with_joint(JointId::HandRight, Point3::default());
        assert!(frame.distance(JointId::HandRight, JointId::ShoulderRight).is_none());
    }

    #[test]
    fn nearest_body_picks_smallest_depth() {
        let tick = SensorTick {
            bodies: vec![body_at(3.0), body_at(1.5), body_at(2.0)],
        };
        let nearest = tick.nearest_body().unwrap();
        assert_eq!(nearest.depth(), Some(1.5));
    }

    #[test]
    fn nearest_body_ignores_untracked_bodies() {
        let mut close = body_at(0.5);
        close.tracked = false;
        let tick = SensorTick {
            bodies: vec![close, body_at(2.5)],
        };
        assert_eq!(tick.nearest_body().unwrap().depth(), Some(2.5));
    }

    #[test]
    fn nearest_body_none_without_tracked_bodies() {
        assert!(SensorTick::default().nearest_body().is_none());
        let tick = SensorTick {
            bodies: vec![PoseFrame::new()],
        };
        assert!(tick.nearest_body().is_none());
    }

    #[test]
    fn pose_frame_parses_from_wire_json() {
        let json = r#"{
            "joints": { "hand_right": { "x": 0.1, "y": 0.5, "z": 1.9 } },
            "projected": { "hand_right": { "x": 240.0, "y": 120.0 } },
            "right_hand": "pointing"
        }"#;
        let frame: PoseFrame = serde_json::from_str(json).unwrap();
        assert!(frame.tracked);
        assert_eq!(frame.hand_state(Side::Right), HandState::Pointing);
        assert_eq!(frame.hand_state(Side::Left), HandState::Unknown);
        assert_eq!(
            frame.projected(JointId::HandRight),
            Some(ScreenPoint::new(240.0, 120.0))
        );
    }

    #[test]
    fn desktop_intent_uses_adjacent_tagging() {
        let intent = DesktopIntent::MoveWindow {
            window: WindowId(7),
            x: 10,
            y: -4,
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["intent"], "MoveWindow");
        assert_eq!(json["payload"]["x"], 10);

        let back: DesktopIntent = serde_json::from_value(json).unwrap();
        assert_eq!(back, intent);
    }

    #[test]
    fn gesture_event_serializes_kind_in_snake_case() {
        let event = GestureEvent::new(GestureKind::WindowDragStart, Some(Side::Left));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "window_drag_start");
        assert_eq!(json["hand"], "left");
        assert_eq!(GestureKind::WindowDragStart.to_string(), "window-drag-start");
    }

    #[test]
    fn error_display() {
        let err = HandwaveError::Desktop {
            operation: "move_window".to_string(),
            details: "access denied".to_string(),
        };
        assert!(err.to_string().contains("move_window"));
        assert!(HandwaveError::UnknownWindow(WindowId(3))
            .to_string()
            .contains("window#3"));
    }
}

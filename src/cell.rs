use std::fmt;

/// Tag names as they appear in save files and the level export.
pub mod tags {
    pub const SOLID_GROUND: &str = "solButton";
    pub const SPIKE: &str = "spike";
    pub const ENEMY: &str = "enemy";
    pub const PLAYER_SPAWN: &str = "playerSpawn";
    pub const END: &str = "end";
    pub const COIN: &str = "coin";
    pub const FALLING_BLOCK: &str = "fall";
    pub const SPIKY_BALL: &str = "spikyBall";
    pub const ONE_WAY_PLATFORM: &str = "oneway";

    // Markers written by the flip tool
    pub const ROTATED: &str = "rotated";
    pub const ROTATION_CLASS_PREFIX: &str = "class-";

    pub fn rotation_class(class_id: u16) -> String {
        format!("{}{}", ROTATION_CLASS_PREFIX, class_id)
    }

    pub fn is_rotation_class(tag: &str) -> bool {
        tag.strip_prefix(ROTATION_CLASS_PREFIX)
            .map_or(false, |rest| matches!(rest, "1" | "2" | "3" | "4"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    Circle,
    Triangle,
}

impl Shape {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "square" => Some(Shape::Square),
            "circle" => Some(Shape::Circle),
            "triangle" => Some(Shape::Triangle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State of one grid cell.
///
/// Tags keep insertion order and never hold duplicates. The base `cell`
/// marker of the grid is implicit and is never stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellState {
    tags: Vec<String>,
    color: Option<String>,
    shape: Option<Shape>,
    rotation: Option<u16>, // None until a rotation is assigned
}

impl CellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn add_tag(&mut self, tag: &str) {
        if !tag.is_empty() && !self.has_tag(tag) {
            self.tags.push(tag.to_string());
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color.filter(|c| !c.is_empty());
    }

    pub fn is_painted(&self) -> bool {
        self.color.is_some()
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn apply_shape(&mut self, shape: Option<Shape>) {
        self.shape = shape;
    }

    /// Rotation in degrees, 0 when never assigned.
    pub fn rotation(&self) -> u16 {
        self.rotation.unwrap_or(0)
    }

    /// Rotation as stored, `None` for a cell that was never rotated or loaded
    /// with a direction.
    pub fn assigned_rotation(&self) -> Option<u16> {
        self.rotation
    }

    /// Sets the rotation, snapping it into [0, 360) on a multiple of 90.
    pub fn set_rotation(&mut self, degrees: Option<i64>) {
        self.rotation = degrees.map(normalize_rotation);
    }

    pub fn is_spike(&self) -> bool {
        self.has_tag(tags::SPIKE)
    }

    /// Clears color, tags and shape. The rotation is left alone.
    pub fn reset(&mut self) {
        self.color = None;
        self.tags.clear();
        self.shape = None;
    }

    /// Turns a spike a quarter turn. Returns false for any other cell.
    pub fn rotate(&mut self) -> bool {
        if !self.is_spike() {
            return false;
        }

        let previous = self.rotation();
        let next = (previous + 90) % 360;
        self.rotation = Some(next);

        self.tags.retain(|t| !tags::is_rotation_class(t));
        let class_index = (previous / 90 + 1) % 4;
        self.add_tag(&tags::rotation_class(class_index + 1));

        if next != 0 {
            self.add_tag(tags::ROTATED);
        } else {
            self.remove_tag(tags::ROTATED);
        }
        true
    }
}

/// Maps any integer angle to 0, 90, 180 or 270.
pub fn normalize_rotation(degrees: i64) -> u16 {
    let wrapped = degrees.rem_euclid(360);
    (wrapped - wrapped % 90) as u16
}

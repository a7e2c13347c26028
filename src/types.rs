//! Shared data model: categories, world locations, live actor records and
//! business-hours windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a live, in-world actor. Assigned by the world engine.
pub type ActorId = Uuid;

pub const ACTOR_SCHEMA_VERSION: u8 = 1;

/// Service category an actor belongs to. Determines which catalog and
/// interaction handler apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bank,
    Trader,
    FoodVendor,
    Processor,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Bank,
        Category::Trader,
        Category::FoodVendor,
        Category::Processor,
    ];

    /// Human-readable label used in operator replies and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bank => "bank desk",
            Category::Trader => "trading post",
            Category::FoodVendor => "food shop",
            Category::Processor => "processing station",
        }
    }

    /// Parse an operator-supplied category keyword.
    pub fn parse(input: &str) -> Option<Category> {
        match input.trim().to_ascii_lowercase().as_str() {
            "bank" => Some(Category::Bank),
            "trader" | "trading" => Some(Category::Trader),
            "food" | "foodvendor" | "food_vendor" => Some(Category::FoodVendor),
            "processor" | "processing" => Some(Category::Processor),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A position in the game world.
///
/// Distances are undefined across worlds; [`Location::distance`] returns
/// `None` in that case rather than a sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl Location {
    pub fn new(world: &str, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.to_string(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn with_facing(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }

    /// Euclidean distance to another location, `None` across worlds.
    pub fn distance(&self, other: &Location) -> Option<f64> {
        if self.world != other.world {
            return None;
        }
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        Some((dx * dx + dy * dy + dz * dz).sqrt())
    }

    /// Compact rendering for operator replies ("world 12,64,-30").
    pub fn describe(&self) -> String {
        format!(
            "{} {:.0},{:.0},{:.0}",
            self.world, self.x, self.y, self.z
        )
    }
}

/// A live, registered service actor. Owned exclusively by the
/// [`ActorRegistry`](crate::registry::ActorRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorRecord {
    pub id: ActorId,
    pub category: Category,
    pub display_name: String,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl ActorRecord {
    pub fn new(id: ActorId, category: Category, display_name: &str, location: Location) -> Self {
        Self {
            id,
            category,
            display_name: display_name.to_string(),
            location,
            created_at: Utc::now(),
            schema_version: ACTOR_SCHEMA_VERSION,
        }
    }
}

/// Daily business-hours window, wrap-around aware.
///
/// `start == end` means open all day. A window like 22..8 spans midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenHours {
    pub start: u8,
    pub end: u8,
}

impl OpenHours {
    pub const ALWAYS: OpenHours = OpenHours { start: 0, end: 0 };

    pub fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    /// Whether the window contains the given hour of day (0..=23).
    pub fn contains(&self, hour: u8) -> bool {
        if self.start == self.end {
            return true;
        }
        if self.start < self.end {
            self.start <= hour && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }

    pub fn describe(&self) -> String {
        if self.start == self.end {
            "open all day".to_string()
        } else {
            format!("{:02}:00-{:02}:00", self.start, self.end)
        }
    }
}

impl Default for OpenHours {
    fn default() -> Self {
        OpenHours::ALWAYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_world() {
        let a = Location::new("overworld", 0.0, 0.0, 0.0);
        let b = Location::new("overworld", 3.0, 4.0, 0.0);
        assert_eq!(a.distance(&b), Some(5.0));
    }

    #[test]
    fn test_distance_across_worlds_undefined() {
        let a = Location::new("overworld", 0.0, 0.0, 0.0);
        let b = Location::new("mines", 0.0, 0.0, 0.0);
        assert_eq!(a.distance(&b), None);
    }

    #[test]
    fn test_open_hours_plain_window() {
        let hours = OpenHours::new(9, 17);
        assert!(!hours.contains(8));
        assert!(hours.contains(9));
        assert!(hours.contains(16));
        assert!(!hours.contains(17));
    }

    #[test]
    fn test_open_hours_wraps_midnight() {
        let hours = OpenHours::new(22, 8);
        assert!(hours.contains(23));
        assert!(hours.contains(0));
        assert!(hours.contains(7));
        assert!(!hours.contains(8));
        assert!(!hours.contains(12));
    }

    #[test]
    fn test_open_hours_equal_means_always_open() {
        let hours = OpenHours::new(5, 5);
        for h in 0..24u8 {
            assert!(hours.contains(h));
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("trader"), Some(Category::Trader));
        assert_eq!(Category::parse("FOOD"), Some(Category::FoodVendor));
        assert_eq!(Category::parse("blacksmith"), None);
    }
}

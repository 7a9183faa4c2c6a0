use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use tagboard_core::BoardError;

pub type TagId = Uuid;

/// Classification axis for tags. A card holds at most one tag each of
/// `Status`, `Priority` and `Category`; `Client` is non-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Status,
    Priority,
    Category,
    Client,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Status,
        Dimension::Priority,
        Dimension::Category,
        Dimension::Client,
    ];

    pub fn is_exclusive(self) -> bool {
        !matches!(self, Dimension::Client)
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Status => "Status",
            Dimension::Priority => "Priority",
            Dimension::Category => "Category",
            Dimension::Client => "Client",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Status => "STATUS",
            Dimension::Priority => "PRIORITY",
            Dimension::Category => "CATEGORY",
            Dimension::Client => "CLIENT",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Dimension {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "STATUS" => Ok(Dimension::Status),
            "PRIORITY" => Ok(Dimension::Priority),
            "CATEGORY" => Ok(Dimension::Category),
            "CLIENT" => Ok(Dimension::Client),
            other => Err(BoardError::Validation(format!(
                "Unknown dimension: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub dimension: Dimension,
    pub color: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String, dimension: Dimension, color: Option<String>, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            dimension,
            color,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color;
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: i32) {
        self.position = position;
        self.updated_at = Utc::now();
    }
}

/// Tags of one dimension, ascending by position. The sort is stable, so
/// tags sharing a position keep their input order.
pub fn tags_by_dimension(tags: &[Tag], dimension: Dimension) -> Vec<&Tag> {
    let mut selected: Vec<&Tag> = tags.iter().filter(|t| t.dimension == dimension).collect();
    selected.sort_by_key(|t| t.position);
    selected
}

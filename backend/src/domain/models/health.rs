//! Derived house health value. Never stored; recomputed on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthBand {
    Thriving,
    Okay,
    NeedsAttention,
}

impl HealthBand {
    /// Fixed thresholds: 80 and up thrives, below 50 needs attention
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => HealthBand::Thriving,
            50..=79 => HealthBand::Okay,
            _ => HealthBand::NeedsAttention,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthBand::Thriving => "Thriving",
            HealthBand::Okay => "Okay",
            HealthBand::NeedsAttention => "Needs Attention",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            HealthBand::Thriving => "success",
            HealthBand::Okay => "warning",
            HealthBand::NeedsAttention => "error",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            HealthBand::Thriving => "🌟",
            HealthBand::Okay => "🙂",
            HealthBand::NeedsAttention => "🚨",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomHealth {
    pub room: String,
    pub score: u8,
    pub band: HealthBand,
    pub assignments_considered: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseHealthResult {
    pub score: u8,
    pub band: HealthBand,
    /// Rooms with at least one assignment in the window, sorted by name
    pub rooms: Vec<RoomHealth>,
    pub assignments_considered: usize,
    pub open_count: usize,
    pub overdue_count: usize,
    pub computed_at: DateTime<Utc>,
}

impl HouseHealthResult {
    pub fn label(&self) -> &'static str {
        self.band.label()
    }

    pub fn room(&self, room: &str) -> Option<&RoomHealth> {
        self.rooms.iter().find(|r| r.room == room)
    }
}

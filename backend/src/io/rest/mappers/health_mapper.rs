use shared::{HouseHealth, HouseHealthResponse, RoomHealth as RoomHealthDto};

use crate::domain::models::{HouseHealthResult, RoomHealth};

pub struct HealthMapper;

impl HealthMapper {
    pub fn room_to_dto(room: RoomHealth) -> RoomHealthDto {
        RoomHealthDto {
            label: room.band.label().to_string(),
            color: room.band.color().to_string(),
            emoji: room.band.emoji().to_string(),
            room: room.room,
            score: room.score,
            assignments_considered: room.assignments_considered,
        }
    }

    pub fn to_dto(result: HouseHealthResult) -> HouseHealth {
        HouseHealth {
            score: result.score,
            label: result.band.label().to_string(),
            color: result.band.color().to_string(),
            emoji: result.band.emoji().to_string(),
            rooms: result.rooms.into_iter().map(Self::room_to_dto).collect(),
            assignments_considered: result.assignments_considered,
            open_count: result.open_count,
            overdue_count: result.overdue_count,
            computed_at: result.computed_at.to_rfc3339(),
        }
    }

    pub fn to_response(result: HouseHealthResult) -> HouseHealthResponse {
        HouseHealthResponse {
            health: Self::to_dto(result),
        }
    }
}

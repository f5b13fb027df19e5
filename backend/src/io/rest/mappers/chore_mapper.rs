use shared::{
    Chore as ChoreDto, ChoreListResponse, ChoreResponse, CreateChoreRequest, RecurrenceSpec,
    UpdateChoreRequest,
};

use crate::domain::commands::chores::{
    ChoreCommandResult, CreateChoreCommand, RecurrenceInput, UpdateChoreCommand,
};
use crate::domain::models::{Chore, RecurrenceRule};

pub struct ChoreMapper;

impl ChoreMapper {
    /// Convert a tagged rule into the flat wire form
    pub fn recurrence_to_dto(rule: &RecurrenceRule) -> RecurrenceSpec {
        match rule {
            RecurrenceRule::Daily => RecurrenceSpec::daily(),
            RecurrenceRule::Weekly { days } => RecurrenceSpec::weekly(days.days()),
            RecurrenceRule::Interval { period_days } => RecurrenceSpec::interval(i64::from(period_days.get())),
        }
    }

    /// Wire form to unvalidated domain input; validation happens in the service
    pub fn recurrence_to_input(spec: RecurrenceSpec) -> RecurrenceInput {
        RecurrenceInput {
            kind: spec.kind,
            days: spec.days,
            period_days: spec.period_days,
        }
    }

    pub fn to_dto(domain: Chore) -> ChoreDto {
        ChoreDto {
            recurrence: Self::recurrence_to_dto(&domain.recurrence),
            id: domain.id,
            household_id: domain.household_id,
            name: domain.name,
            icon: domain.icon,
            room: domain.room,
            points: domain.points,
            is_active: domain.is_active,
            active_since: shared::format_date(domain.active_since),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_create_command(request: CreateChoreRequest) -> CreateChoreCommand {
        CreateChoreCommand {
            name: request.name,
            icon: request.icon,
            room: request.room,
            points: request.points,
            recurrence: Self::recurrence_to_input(request.recurrence),
        }
    }

    pub fn to_update_command(chore_id: String, request: UpdateChoreRequest) -> UpdateChoreCommand {
        UpdateChoreCommand {
            chore_id,
            name: request.name,
            icon: request.icon,
            room: request.room,
            points: request.points,
            recurrence: request.recurrence.map(Self::recurrence_to_input),
        }
    }

    pub fn to_chore_response(result: ChoreCommandResult) -> ChoreResponse {
        ChoreResponse {
            chore: Self::to_dto(result.chore),
            success_message: result.success_message,
        }
    }

    pub fn to_list_response(chores: Vec<Chore>) -> ChoreListResponse {
        ChoreListResponse {
            chores: chores.into_iter().map(Self::to_dto).collect(),
        }
    }
}

use shared::{
    ChoreAssignment as ChoreAssignmentDto, ChoreHistoryResponse, CompleteAssignmentResponse,
    CompletionRecord as CompletionRecordDto, GenerateAssignmentsResponse, MemberStreakResponse,
    OverdueAssignment as OverdueAssignmentDto, OverdueAssignmentsResponse,
    SkippedChore as SkippedChoreDto,
};

use crate::domain::commands::assignments::{
    CompleteAssignmentResult, GenerateDueAssignmentsResult, MemberStreak, OverdueAssignment,
};
use crate::domain::models::{ChoreAssignment, CompletionRecord};

pub struct AssignmentMapper;

impl AssignmentMapper {
    pub fn to_dto(domain: ChoreAssignment) -> ChoreAssignmentDto {
        ChoreAssignmentDto {
            id: domain.id,
            chore_id: domain.chore_id,
            household_id: domain.household_id,
            assigned_to: domain.assigned_to,
            due_date: shared::format_date(domain.due_date),
            completed_at: domain.completed_at.map(|at| at.to_rfc3339()),
            completed_by: domain.completed_by,
            bonus: domain.bonus,
            points_awarded: domain.points_awarded,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn completion_to_dto(domain: CompletionRecord) -> CompletionRecordDto {
        CompletionRecordDto {
            assignment_id: domain.assignment_id,
            chore_id: domain.chore_id,
            chore_name: domain.chore_name,
            assigned_to: domain.assigned_to,
            completed_by: domain.completed_by,
            completed_by_name: domain.completed_by_name,
            due_date: shared::format_date(domain.due_date),
            completed_at: domain.completed_at.to_rfc3339(),
            was_takeover: domain.was_takeover,
            bonus: domain.bonus,
            points_awarded: domain.points_awarded,
        }
    }

    pub fn to_generate_response(result: GenerateDueAssignmentsResult) -> GenerateAssignmentsResponse {
        GenerateAssignmentsResponse {
            created: result.created.into_iter().map(Self::to_dto).collect(),
            skipped: result
                .skipped
                .into_iter()
                .map(|skipped| SkippedChoreDto {
                    chore_id: skipped.chore_id,
                    reason: skipped.reason,
                })
                .collect(),
        }
    }

    pub fn to_complete_response(result: CompleteAssignmentResult) -> CompleteAssignmentResponse {
        CompleteAssignmentResponse {
            assignment: Self::to_dto(result.assignment),
            completion: Self::completion_to_dto(result.completion),
            newly_completed: result.newly_completed,
        }
    }

    pub fn to_history_response(chore_id: String, completions: Vec<CompletionRecord>) -> ChoreHistoryResponse {
        ChoreHistoryResponse {
            chore_id,
            completions: completions.into_iter().map(Self::completion_to_dto).collect(),
        }
    }

    pub fn to_overdue_response(overdue: Vec<OverdueAssignment>) -> OverdueAssignmentsResponse {
        OverdueAssignmentsResponse {
            overdue: overdue
                .into_iter()
                .map(|item| OverdueAssignmentDto {
                    assignment: Self::to_dto(item.assignment),
                    chore_name: item.chore_name,
                    days_overdue: item.days_overdue,
                })
                .collect(),
        }
    }

    pub fn to_streak_response(streak: MemberStreak) -> MemberStreakResponse {
        MemberStreakResponse {
            member_id: streak.member_id,
            streak_days: streak.streak_days,
            last_completion_date: streak.last_completion_date.map(shared::format_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_open_assignment_has_no_completion_fields() {
        let assignment = ChoreAssignment {
            id: "assignment::chore::a::2024-03-04".to_string(),
            chore_id: "chore::a".to_string(),
            household_id: "household::default".to_string(),
            assigned_to: "member::x".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            completed_at: None,
            completed_by: None,
            bonus: false,
            points_awarded: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap(),
        };

        let dto = AssignmentMapper::to_dto(assignment);
        assert_eq!(dto.due_date, "2024-03-04");
        assert_eq!(dto.created_at, "2024-03-04T07:00:00+00:00");
        assert!(dto.completed_at.is_none());
        assert!(dto.completed_by.is_none());
    }
}

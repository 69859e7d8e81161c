use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        format_system_time,
        validation::{validate_employee_id, validate_not_blank},
    },
    state::game::{ModerationDecision, Task, TaskStatus},
};

/// Payload used by a mom to file a new dare for her child.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Handle of the authoring mom. The target is always her child.
    #[validate(custom(function = validate_employee_id))]
    pub employee_id: String,
    /// Dare text.
    #[validate(custom(function = validate_not_blank))]
    pub content: String,
}

/// Moderator verdict on a pending dare.
#[derive(Debug, Deserialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModerationDecisionDto {
    Approve,
    Reject,
}

impl From<ModerationDecisionDto> for ModerationDecision {
    fn from(value: ModerationDecisionDto) -> Self {
        match value {
            ModerationDecisionDto::Approve => ModerationDecision::Approve,
            ModerationDecisionDto::Reject => ModerationDecision::Reject,
        }
    }
}

/// Payload carrying a moderation verdict.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerateTaskRequest {
    pub decision: ModerationDecisionDto,
    /// Reason surfaced to the mom on rejection; a blank value falls back
    /// to the stock reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Payload confirming a dare was performed.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    /// Handle of the player marking the dare done. Must be its target.
    #[validate(custom(function = validate_employee_id))]
    pub employee_id: String,
    /// Optional note from the child about how it went.
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Wire status of a dare.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatusDto {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl From<&TaskStatus> for TaskStatusDto {
    fn from(value: &TaskStatus) -> Self {
        match value {
            TaskStatus::Pending => TaskStatusDto::Pending,
            TaskStatus::Approved => TaskStatusDto::Approved,
            TaskStatus::Rejected => TaskStatusDto::Rejected,
            TaskStatus::Completed => TaskStatusDto::Completed,
        }
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Public projection of a dare exposed to REST/SSE clients.
pub struct TaskSummary {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub content: String,
    pub status: TaskStatusDto,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub points: u32,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            from_id: task.from_id,
            to_id: task.to_id,
            content: task.content.clone(),
            status: TaskStatusDto::from(&task.status),
            created_at: format_system_time(task.created_at),
            rejection_reason: task.rejection_reason.clone(),
            feedback: task.feedback.clone(),
            points: task.points,
        }
    }
}

/// A dare idea served by the suggestion endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::{
    game::UserSummary,
    validation::{validate_employee_id, validate_not_blank},
};

/// Payload used to sign a new player up during the registration phase.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name shown to other players.
    #[validate(custom(function = validate_not_blank))]
    pub name: String,
    /// Unique handle the player will log in with.
    #[validate(custom(function = validate_employee_id))]
    pub employee_id: String,
    /// Password, compared verbatim on login.
    #[validate(custom(function = validate_not_blank))]
    pub password: String,
}

/// Credentials presented on login.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = validate_employee_id))]
    pub employee_id: String,
    #[validate(custom(function = validate_not_blank))]
    pub password: String,
}

/// Role granted to an authenticated session.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// Regular participant.
    Player,
    /// Moderator signed in with the reserved handle.
    Admin,
}

/// Outcome of a successful login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub role: SessionRole,
    /// Player projection, absent for the moderator session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

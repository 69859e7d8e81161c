use serde::Serialize;
use utoipa::ToSchema;

/// Payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` while the store is reachable, `degraded` otherwise.
    pub status: HealthStatus,
}

/// Coarse backend health indicator.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Storage reachable; mutations are accepted.
    Ok,
    /// Running without storage; mutations are refused.
    Degraded,
}

impl HealthResponse {
    /// Build the response from the shared degraded flag.
    pub fn from_degraded(degraded: bool) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self { status }
    }
}

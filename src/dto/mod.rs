pub mod auth_dto;
pub mod candidate_dto;
pub mod church_dto;
pub mod interest_dto;
pub mod job_dto;

use serde::{Deserialize, Serialize};

/// Body of the activation toggles for churches and accounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetActivePayload {
    pub is_active: bool,
}

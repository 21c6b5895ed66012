use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::interest::{InterestExpression, InterestSide, MutualMatch};

/// `side` defaults to the caller's role and the caller's own id is taken from
/// the session when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetInterestPayload {
    pub church_id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
    pub interested: bool,
    pub side: Option<InterestSide>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestResponse {
    pub interest: InterestExpression,
    pub mutual: bool,
    pub matched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestListResponse {
    pub items: Vec<InterestResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutualMatchListResponse {
    pub items: Vec<MutualMatch>,
}

impl From<InterestExpression> for InterestResponse {
    fn from(interest: InterestExpression) -> Self {
        Self {
            mutual: interest.is_mutual(),
            matched_at: interest.matched_at(),
            interest,
        }
    }
}

impl From<Vec<InterestExpression>> for InterestListResponse {
    fn from(interests: Vec<InterestExpression>) -> Self {
        Self {
            items: interests.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolved write, after session defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestCommand {
    pub side: InterestSide,
    pub church_id: Uuid,
    pub candidate_id: Uuid,
    pub interested: bool,
}

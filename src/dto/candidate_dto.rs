use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::candidate::{Candidate, CandidateChanges, CandidateStatus};
use crate::utils::{media::youtube_embed_url, validation::non_blank};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub street_address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 50))]
    pub state: Option<String>,
    #[validate(length(max = 20))]
    pub zip_code: Option<String>,
    #[validate(length(max = 200))]
    pub event: Option<String>,
    #[validate(url)]
    pub resume_url: Option<String>,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(url)]
    pub picture_url: Option<String>,
}

impl From<UpdateProfilePayload> for CandidateChanges {
    fn from(payload: UpdateProfilePayload) -> Self {
        Self {
            name: non_blank(payload.name),
            phone: non_blank(payload.phone),
            street_address: non_blank(payload.street_address),
            city: non_blank(payload.city),
            state: non_blank(payload.state),
            zip_code: non_blank(payload.zip_code),
            event: non_blank(payload.event),
            resume_url: non_blank(payload.resume_url),
            video_url: non_blank(payload.video_url),
            picture_url: non_blank(payload.picture_url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSort {
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateSearchQuery {
    pub query: Option<String>,
    pub status: Option<CandidateStatus>,
    pub sort: Option<CandidateSort>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewQuery {
    pub status: Option<CandidateStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCandidateStatusPayload {
    pub status: CandidateStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub event: Option<String>,
    pub resume_url: Option<String>,
    pub video_url: Option<String>,
    pub video_embed_url: Option<String>,
    pub picture_url: Option<String>,
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateResponse {
    fn from(value: Candidate) -> Self {
        let video_embed_url = value.video_url.as_deref().map(youtube_embed_url);
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            street_address: value.street_address,
            city: value.city,
            state: value.state,
            zip_code: value.zip_code,
            event: value.event,
            resume_url: value.resume_url,
            video_url: value.video_url,
            video_embed_url,
            picture_url: value.picture_url,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateListResponse {
    pub items: Vec<CandidateResponse>,
    pub total: usize,
}

impl From<Vec<Candidate>> for CandidateListResponse {
    fn from(candidates: Vec<Candidate>) -> Self {
        let items: Vec<CandidateResponse> = candidates.into_iter().map(Into::into).collect();
        Self {
            total: items.len(),
            items,
        }
    }
}

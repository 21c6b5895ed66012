use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Profile lifecycle. Only `Approved` candidates are visible to churches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "candidate_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CandidateStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl CandidateStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateStatus::Draft => "draft",
            CandidateStatus::Pending => "pending",
            CandidateStatus::Approved => "approved",
            CandidateStatus::Rejected => "rejected",
        }
    }

    pub fn can_transition_to(self, next: CandidateStatus) -> bool {
        use CandidateStatus::*;
        matches!(
            (self, next),
            (Draft, Pending)
                | (Pending, Approved)
                | (Pending, Rejected)
                | (Pending, Draft)
                | (Rejected, Pending)
                | (Approved, Rejected)
        )
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
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
    pub picture_url: Option<String>,
    pub status: CandidateStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCandidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Partial profile edit; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub event: Option<String>,
    pub resume_url: Option<String>,
    pub video_url: Option<String>,
    pub picture_url: Option<String>,
}

impl CandidateChanges {
    pub fn apply(self, candidate: &mut Candidate) {
        if let Some(v) = self.name {
            candidate.name = v;
        }
        if self.phone.is_some() {
            candidate.phone = self.phone;
        }
        if self.street_address.is_some() {
            candidate.street_address = self.street_address;
        }
        if self.city.is_some() {
            candidate.city = self.city;
        }
        if self.state.is_some() {
            candidate.state = self.state;
        }
        if self.zip_code.is_some() {
            candidate.zip_code = self.zip_code;
        }
        if self.event.is_some() {
            candidate.event = self.event;
        }
        if self.resume_url.is_some() {
            candidate.resume_url = self.resume_url;
        }
        if self.video_url.is_some() {
            candidate.video_url = self.video_url;
        }
        if self.picture_url.is_some() {
            candidate.picture_url = self.picture_url;
        }
    }
}

/// Directory lookup criteria. Results keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    pub status: Option<CandidateStatus>,
    pub text: Option<String>,
}

impl CandidateFilter {
    pub fn matches(&self, candidate: &Candidate) -> bool {
        if let Some(status) = self.status {
            if candidate.status != status {
                return false;
            }
        }
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                candidate.name.to_lowercase().contains(&needle)
                    || candidate.email.to_lowercase().contains(&needle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, email: &str, status: CandidateStatus) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            phone: None,
            street_address: None,
            city: None,
            state: None,
            zip_code: None,
            event: None,
            resume_url: None,
            video_url: None,
            picture_url: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn transition_table() {
        use CandidateStatus::*;
        assert!(Draft.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Rejected));
        assert!(!Draft.can_transition_to(Approved));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Approved));
    }

    #[test]
    fn filter_matches_name_or_email_case_insensitively() {
        let jane = candidate("Jane Doe", "jane@example.com", CandidateStatus::Approved);
        let by_name = CandidateFilter { status: None, text: Some("JANE".into()) };
        let by_email = CandidateFilter { status: None, text: Some("@EXAMPLE".into()) };
        let miss = CandidateFilter { status: None, text: Some("smith".into()) };
        assert!(by_name.matches(&jane));
        assert!(by_email.matches(&jane));
        assert!(!miss.matches(&jane));
    }

    #[test]
    fn filter_respects_status_and_blank_text() {
        let pending = candidate("John", "john@example.com", CandidateStatus::Pending);
        let approved_only = CandidateFilter {
            status: Some(CandidateStatus::Approved),
            text: Some("   ".into()),
        };
        assert!(!approved_only.matches(&pending));
        assert!(CandidateFilter::default().matches(&pending));
    }

    #[test]
    fn changes_only_touch_present_fields() {
        let mut c = candidate("Jane", "jane@example.com", CandidateStatus::Draft);
        c.city = Some("Springfield".into());
        CandidateChanges {
            phone: Some("555-123-4567".into()),
            ..Default::default()
        }
        .apply(&mut c);
        assert_eq!(c.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(c.city.as_deref(), Some("Springfield"));
        assert_eq!(c.name, "Jane");
    }
}

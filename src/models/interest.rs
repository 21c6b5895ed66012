use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Which party's flag an interest write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestSide {
    Church,
    Candidate,
}

impl InterestSide {
    pub fn as_str(self) -> &'static str {
        match self {
            InterestSide::Church => "church",
            InterestSide::Candidate => "candidate",
        }
    }
}

impl std::fmt::Display for InterestSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-pair interest flags. A missing record reads as both flags unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InterestExpression {
    pub church_id: Uuid,
    pub candidate_id: Uuid,
    pub church_interested: bool,
    pub church_updated_at: Option<DateTime<Utc>>,
    pub candidate_interested: bool,
    pub candidate_updated_at: Option<DateTime<Utc>>,
}

impl InterestExpression {
    pub fn empty(church_id: Uuid, candidate_id: Uuid) -> Self {
        Self {
            church_id,
            candidate_id,
            church_interested: false,
            church_updated_at: None,
            candidate_interested: false,
            candidate_updated_at: None,
        }
    }

    /// Writes one side's flag. Returns false when the flag already held `interested`,
    /// in which case the timestamp is left alone.
    pub fn set_flag(&mut self, side: InterestSide, interested: bool, at: DateTime<Utc>) -> bool {
        let (flag, stamp) = match side {
            InterestSide::Church => (&mut self.church_interested, &mut self.church_updated_at),
            InterestSide::Candidate => {
                (&mut self.candidate_interested, &mut self.candidate_updated_at)
            }
        };
        if *flag == interested {
            return false;
        }
        *flag = interested;
        *stamp = Some(at);
        true
    }

    pub fn is_mutual(&self) -> bool {
        self.church_interested && self.candidate_interested
    }

    /// When the second flag went up. `None` unless the pair is mutual.
    pub fn matched_at(&self) -> Option<DateTime<Utc>> {
        if !self.is_mutual() {
            return None;
        }
        match (self.church_updated_at, self.candidate_updated_at) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn counterparty(&self, side: InterestSide) -> Uuid {
        match side {
            InterestSide::Church => self.candidate_id,
            InterestSide::Candidate => self.church_id,
        }
    }
}

/// One entry of a party's mutual-match listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualMatch {
    pub counterparty_id: Uuid,
    pub matched_at: DateTime<Utc>,
}

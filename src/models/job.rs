use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Approved,
    Rejected,
    Closed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Approved => "approved",
            JobStatus::Rejected => "rejected",
            JobStatus::Closed => "closed",
        }
    }

    /// Admin review moves. Closing is the owning church's call and goes through `close`.
    pub fn can_review_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Approved)
                | (JobStatus::Pending, JobStatus::Rejected)
                | (JobStatus::Approved, JobStatus::Rejected)
                | (JobStatus::Rejected, JobStatus::Approved)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub church_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_from: Option<Decimal>,
    pub salary_to: Option<Decimal>,
}

impl JobChanges {
    /// Whether applying these changes would alter any field of `job`.
    pub fn alters(&self, job: &Job) -> bool {
        self.title.as_ref().is_some_and(|title| *title != job.title)
            || (self.description.is_some() && self.description != job.description)
            || (self.location.is_some() && self.location != job.location)
            || (self.employment_type.is_some() && self.employment_type != job.employment_type)
            || (self.salary_from.is_some() && self.salary_from != job.salary_from)
            || (self.salary_to.is_some() && self.salary_to != job.salary_to)
    }

    pub fn apply(self, job: &mut Job) {
        if let Some(title) = self.title {
            job.title = title;
        }
        if self.description.is_some() {
            job.description = self.description;
        }
        if self.location.is_some() {
            job.location = self.location;
        }
        if self.employment_type.is_some() {
            job.employment_type = self.employment_type;
        }
        if self.salary_from.is_some() {
            job.salary_from = self.salary_from;
        }
        if self.salary_to.is_some() {
            job.salary_to = self.salary_to;
        }
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{CandidateStore, ChurchStore, InterestStore, JobFilter, JobStore, UserStore};
use crate::error::{Error, Result};
use crate::models::{
    candidate::{Candidate, CandidateChanges, CandidateFilter, CandidateStatus, NewCandidate},
    church::{Church, NewChurch},
    interest::{InterestExpression, InterestSide},
    job::{Job, JobChanges, JobStatus},
    user::{Role, User},
};

const USER_COLUMNS: &str = "id, email, name, password_hash, role, party_id, needs_password_change, is_active, created_at, updated_at";

const CANDIDATE_COLUMNS: &str = "id, name, email, phone, street_address, city, state, zip_code, event, resume_url, video_url, picture_url, status, created_at, updated_at";

const CHURCH_COLUMNS: &str = "id, name, email, phone, street_address, city, state, zip_code, is_active, created_at, updated_at";

const JOB_COLUMNS: &str = "id, church_id, title, description, location, employment_type, salary_from, salary_to, status, created_at, updated_at";

const INTEREST_COLUMNS: &str = "church_id, candidate_id, church_interested, church_updated_at, candidate_interested, candidate_updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let query = format!(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, party_id, needs_password_change, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.password_hash)
            .bind(user.role)
            .bind(user.party_id)
            .bind(user.needs_password_change)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: String,
        needs_password_change: bool,
    ) -> Result<User> {
        let query = format!(
            r#"
            UPDATE users
            SET password_hash = $2, needs_password_change = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(password_hash)
            .bind(needs_password_change)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE ($1::user_role IS NULL OR role = $1) ORDER BY created_at",
            USER_COLUMNS
        );
        let rows = sqlx::query_as::<_, User>(&query)
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> Result<User> {
        let query = format!(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }
}

#[async_trait]
impl CandidateStore for PgStore {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Candidate> {
        let query = format!(
            r#"
            INSERT INTO candidates (id, name, email, status)
            VALUES ($1, $2, $3, 'draft')
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, Candidate>(&query)
            .bind(candidate.id)
            .bind(candidate.name)
            .bind(candidate.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>> {
        let query = format!("SELECT {} FROM candidates WHERE id = $1", CANDIDATE_COLUMNS);
        let row = sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_candidate(&self, id: Uuid, changes: CandidateChanges) -> Result<Candidate> {
        let query = format!(
            r#"
            UPDATE candidates
            SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                street_address = COALESCE($4, street_address),
                city = COALESCE($5, city),
                state = COALESCE($6, state),
                zip_code = COALESCE($7, zip_code),
                event = COALESCE($8, event),
                resume_url = COALESCE($9, resume_url),
                video_url = COALESCE($10, video_url),
                picture_url = COALESCE($11, picture_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .bind(changes.name)
            .bind(changes.phone)
            .bind(changes.street_address)
            .bind(changes.city)
            .bind(changes.state)
            .bind(changes.zip_code)
            .bind(changes.event)
            .bind(changes.resume_url)
            .bind(changes.video_url)
            .bind(changes.picture_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_candidate_status(
        &self,
        id: Uuid,
        from: CandidateStatus,
        to: CandidateStatus,
    ) -> Result<Candidate> {
        let query = format!(
            r#"
            UPDATE candidates
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            CANDIDATE_COLUMNS
        );
        let row = sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(candidate) => Ok(candidate),
            None if self.get_candidate(id).await?.is_some() => Err(Error::Conflict(format!(
                "Candidate {} status changed concurrently",
                id
            ))),
            None => Err(Error::NotFound(format!("Candidate {} not found", id))),
        }
    }

    async fn search_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Candidate>> {
        let text = filter
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        let query = format!(
            r#"
            SELECT {}
            FROM candidates
            WHERE ($1::candidate_status IS NULL OR status = $1)
              AND ($2::text IS NULL OR strpos(lower(name), $2) > 0 OR strpos(lower(email), $2) > 0)
            ORDER BY seq
            "#,
            CANDIDATE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Candidate>(&query)
            .bind(filter.status)
            .bind(text)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl ChurchStore for PgStore {
    async fn insert_church(&self, church: NewChurch) -> Result<Church> {
        let query = format!(
            r#"
            INSERT INTO churches (id, name, email, phone, street_address, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CHURCH_COLUMNS
        );
        let row = sqlx::query_as::<_, Church>(&query)
            .bind(church.id)
            .bind(church.name)
            .bind(church.email)
            .bind(church.phone)
            .bind(church.street_address)
            .bind(church.city)
            .bind(church.state)
            .bind(church.zip_code)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_church(&self, id: Uuid) -> Result<Option<Church>> {
        let query = format!("SELECT {} FROM churches WHERE id = $1", CHURCH_COLUMNS);
        let row = sqlx::query_as::<_, Church>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_churches(&self) -> Result<Vec<Church>> {
        let query = format!("SELECT {} FROM churches ORDER BY name", CHURCH_COLUMNS);
        let rows = sqlx::query_as::<_, Church>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_church_active(&self, id: Uuid, is_active: bool) -> Result<Church> {
        let query = format!(
            r#"
            UPDATE churches
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CHURCH_COLUMNS
        );
        let row = sqlx::query_as::<_, Church>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| Error::NotFound(format!("Church {} not found", id)))
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn insert_job(&self, job: Job) -> Result<Job> {
        let query = format!(
            r#"
            INSERT INTO jobs (id, church_id, title, description, location, employment_type, salary_from, salary_to, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, Job>(&query)
            .bind(job.id)
            .bind(job.church_id)
            .bind(job.title)
            .bind(job.description)
            .bind(job.location)
            .bind(job.employment_type)
            .bind(job.salary_from)
            .bind(job.salary_to)
            .bind(job.status)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let row = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_job(&self, id: Uuid, changes: JobChanges) -> Result<Job> {
        let query = format!(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                employment_type = COALESCE($5, employment_type),
                salary_from = COALESCE($6, salary_from),
                salary_to = COALESCE($7, salary_to),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.location)
            .bind(changes.employment_type)
            .bind(changes.salary_from)
            .bind(changes.salary_to)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_job_status(&self, id: Uuid, from: JobStatus, to: JobStatus) -> Result<Job> {
        let query = format!(
            r#"
            UPDATE jobs
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(job) => Ok(job),
            None if self.get_job(id).await?.is_some() => Err(Error::Conflict(format!(
                "Job {} status changed concurrently",
                id
            ))),
            None => Err(Error::NotFound(format!("Job {} not found", id))),
        }
    }

    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let query = format!(
            r#"
            SELECT {}
            FROM jobs
            WHERE ($1::uuid IS NULL OR church_id = $1)
              AND ($2::job_status IS NULL OR status = $2)
            ORDER BY created_at DESC, id
            "#,
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, Job>(&query)
            .bind(filter.church_id)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

fn interest_columns(side: InterestSide) -> (&'static str, &'static str) {
    match side {
        InterestSide::Church => ("church_interested", "church_updated_at"),
        InterestSide::Candidate => ("candidate_interested", "candidate_updated_at"),
    }
}

#[async_trait]
impl InterestStore for PgStore {
    async fn get_interest(
        &self,
        church_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<InterestExpression>> {
        let query = format!(
            "SELECT {} FROM interest_expressions WHERE church_id = $1 AND candidate_id = $2",
            INTEREST_COLUMNS
        );
        let row = sqlx::query_as::<_, InterestExpression>(&query)
            .bind(church_id)
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn set_interest(
        &self,
        side: InterestSide,
        church_id: Uuid,
        candidate_id: Uuid,
        interested: bool,
        at: DateTime<Utc>,
    ) -> Result<InterestExpression> {
        let (flag, stamp) = interest_columns(side);

        // One statement per write: the row lock taken by the upsert orders
        // concurrent writers, and an unchanged flag keeps its timestamp.
        if interested {
            let query = format!(
                r#"
                INSERT INTO interest_expressions (church_id, candidate_id, {flag}, {stamp})
                VALUES ($1, $2, TRUE, $3)
                ON CONFLICT (church_id, candidate_id) DO UPDATE SET
                    {stamp} = CASE WHEN interest_expressions.{flag} THEN interest_expressions.{stamp} ELSE EXCLUDED.{stamp} END,
                    {flag} = TRUE
                RETURNING {columns}
                "#,
                flag = flag,
                stamp = stamp,
                columns = INTEREST_COLUMNS
            );
            let row = sqlx::query_as::<_, InterestExpression>(&query)
                .bind(church_id)
                .bind(candidate_id)
                .bind(at)
                .fetch_one(&self.pool)
                .await?;
            return Ok(row);
        }

        let query = format!(
            r#"
            UPDATE interest_expressions SET
                {stamp} = CASE WHEN {flag} THEN $3 ELSE {stamp} END,
                {flag} = FALSE
            WHERE church_id = $1 AND candidate_id = $2
            RETURNING {columns}
            "#,
            flag = flag,
            stamp = stamp,
            columns = INTEREST_COLUMNS
        );
        let row = sqlx::query_as::<_, InterestExpression>(&query)
            .bind(church_id)
            .bind(candidate_id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.unwrap_or_else(|| InterestExpression::empty(church_id, candidate_id)))
    }

    async fn list_interests_for_church(&self, church_id: Uuid) -> Result<Vec<InterestExpression>> {
        let query = format!(
            "SELECT {} FROM interest_expressions WHERE church_id = $1 ORDER BY candidate_id",
            INTEREST_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterestExpression>(&query)
            .bind(church_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_interests_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<InterestExpression>> {
        let query = format!(
            "SELECT {} FROM interest_expressions WHERE candidate_id = $1 ORDER BY church_id",
            INTEREST_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterestExpression>(&query)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

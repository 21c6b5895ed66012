use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::BootstrapAccount;
use crate::database::{CandidateStore, UserStore};
use crate::dto::auth_dto::{
    ChangePasswordPayload, CreateUserPayload, LoginPayload, LoginResponse,
    ProvisionedAccountResponse, RegisterPayload,
};
use crate::error::{Error, Result};
use crate::models::{
    candidate::NewCandidate,
    session::Session,
    user::{Role, User},
};
use crate::utils::{
    crypto::{hash_password, verify_password},
    time::{hours_from_now, now},
    token::{generate_temporary_password, issue_token},
    validation::normalize_email,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    candidates: Arc<dyn CandidateStore>,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        candidates: Arc<dyn CandidateStore>,
        jwt_secret: String,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            users,
            candidates,
            jwt_secret,
            token_ttl_hours,
        }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<LoginResponse> {
        let email = normalize_email(&payload.email);
        let user = match self.users.find_user_by_email(&email).await? {
            Some(user) if user.is_active => user,
            Some(_) | None => {
                warn!(email = %email, "login rejected");
                return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
            }
        };
        if !verify_password(&payload.password, &user.password_hash)? {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let session = Session {
            user_id: user.id,
            role: user.role,
            party_id: user.party_id,
        };
        let expires_at = hours_from_now(self.token_ttl_hours);
        let token = issue_token(&self.jwt_secret, &session, expires_at)?;
        info!(user_id = %user.id, role = %user.role, "login succeeded");
        Ok(LoginResponse::new(token, expires_at, user))
    }

    /// Creates a draft candidate profile together with its login account.
    pub async fn register_candidate(&self, payload: RegisterPayload) -> Result<User> {
        let email = normalize_email(&payload.email);
        self.ensure_email_free(&email).await?;
        let password_hash = hash_password(&payload.password)?;

        let candidate = self
            .candidates
            .insert_candidate(NewCandidate {
                id: Uuid::new_v4(),
                name: payload.name.trim().to_string(),
                email: email.clone(),
            })
            .await?;
        let user = self
            .users
            .insert_user(new_user(
                email,
                candidate.name.clone(),
                password_hash,
                Role::Candidate,
                Some(candidate.id),
                false,
            ))
            .await?;
        info!(user_id = %user.id, candidate_id = %candidate.id, "candidate registered");
        Ok(user)
    }

    pub async fn change_password(
        &self,
        session: &Session,
        payload: ChangePasswordPayload,
    ) -> Result<()> {
        let user = self
            .users
            .find_user(session.user_id)
            .await?
            .ok_or_else(|| Error::Unauthorized("Account no longer exists".into()))?;
        if !verify_password(&payload.current_password, &user.password_hash)? {
            return Err(Error::Unauthorized("Current password is incorrect".into()));
        }
        let password_hash = hash_password(&payload.new_password)?;
        self.users
            .update_password(user.id, password_hash, false)
            .await?;
        info!(user_id = %user.id, "password changed");
        Ok(())
    }

    /// Creates an account with a generated temporary password that must be
    /// changed at first login. The plain password is returned once.
    pub async fn provision_account(
        &self,
        name: &str,
        email: &str,
        role: Role,
        party_id: Option<Uuid>,
    ) -> Result<ProvisionedAccountResponse> {
        let email = normalize_email(email);
        let temporary_password = generate_temporary_password();
        let password_hash = hash_password(&temporary_password)?;
        let user = self
            .users
            .insert_user(new_user(
                email,
                name.trim().to_string(),
                password_hash,
                role,
                party_id,
                true,
            ))
            .await?;
        info!(user_id = %user.id, role = %role, "account provisioned");
        Ok(ProvisionedAccountResponse {
            user: user.into(),
            temporary_password,
        })
    }

    /// Superadmin-only creation of administrator accounts.
    pub async fn create_user(
        &self,
        session: &Session,
        payload: CreateUserPayload,
    ) -> Result<ProvisionedAccountResponse> {
        session.require_superadmin()?;
        match payload.role {
            Role::Admin | Role::SuperAdmin => {}
            Role::Church | Role::Candidate => {
                return Err(Error::BadRequest(format!(
                    "{} accounts are created through their own flows",
                    payload.role
                )))
            }
        }
        self.ensure_email_free(&normalize_email(&payload.email))
            .await?;
        self.provision_account(&payload.name, &payload.email, payload.role, None)
            .await
    }

    pub async fn list_users(&self, session: &Session, role: Option<Role>) -> Result<Vec<User>> {
        session.require_superadmin()?;
        self.users.list_users(role).await
    }

    /// Deactivated accounts can no longer sign in. Tokens already issued stay
    /// valid until they expire.
    pub async fn set_user_active(
        &self,
        session: &Session,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<User> {
        session.require_superadmin()?;
        if user_id == session.user_id && !is_active {
            return Err(Error::BadRequest("You cannot deactivate your own account".into()));
        }
        let user = self.users.set_user_active(user_id, is_active).await?;
        info!(user_id = %user.id, is_active, changed_by = %session.user_id, "account activation changed");
        Ok(user)
    }

    /// Returns whether an account was created.
    pub async fn ensure_superadmin(&self, account: &BootstrapAccount) -> Result<bool> {
        let email = normalize_email(&account.email);
        if self.users.find_user_by_email(&email).await?.is_some() {
            return Ok(false);
        }
        let password_hash = hash_password(&account.password)?;
        let user = self
            .users
            .insert_user(new_user(
                email,
                "Super Administrator".to_string(),
                password_hash,
                Role::SuperAdmin,
                None,
                false,
            ))
            .await?;
        info!(user_id = %user.id, "bootstrap superadmin created");
        Ok(true)
    }

    pub async fn ensure_email_free(&self, email: &str) -> Result<()> {
        if self.users.find_user_by_email(email).await?.is_some() {
            return Err(Error::Conflict(format!("Email {} is already registered", email)));
        }
        Ok(())
    }
}

fn new_user(
    email: String,
    name: String,
    password_hash: String,
    role: Role,
    party_id: Option<Uuid>,
    needs_password_change: bool,
) -> User {
    let now = now();
    User {
        id: Uuid::new_v4(),
        email,
        name,
        password_hash,
        role,
        party_id,
        needs_password_change,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

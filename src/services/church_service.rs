use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::ChurchStore;
use crate::dto::church_dto::{CreateChurchPayload, CreateChurchResponse};
use crate::error::{Error, Result};
use crate::models::{
    church::{Church, NewChurch},
    session::Session,
    user::Role,
};
use crate::services::auth_service::AuthService;
use crate::utils::validation::{non_blank, normalize_email};

#[derive(Clone)]
pub struct ChurchService {
    churches: Arc<dyn ChurchStore>,
    auth: AuthService,
}

impl ChurchService {
    pub fn new(churches: Arc<dyn ChurchStore>, auth: AuthService) -> Self {
        Self { churches, auth }
    }

    /// Creates the church and its login account. The account's temporary
    /// password is only ever returned here.
    pub async fn create_church(
        &self,
        session: &Session,
        payload: CreateChurchPayload,
    ) -> Result<CreateChurchResponse> {
        session.require_admin()?;
        let email = normalize_email(&payload.email);
        self.auth.ensure_email_free(&email).await?;

        let church = self
            .churches
            .insert_church(NewChurch {
                id: Uuid::new_v4(),
                name: payload.name.trim().to_string(),
                email: email.clone(),
                phone: non_blank(payload.phone),
                street_address: non_blank(payload.street_address),
                city: non_blank(payload.city),
                state: non_blank(payload.state),
                zip_code: non_blank(payload.zip_code),
            })
            .await?;
        let account = self
            .auth
            .provision_account(&church.name, &email, Role::Church, Some(church.id))
            .await?;
        info!(church_id = %church.id, created_by = %session.user_id, "church created");
        Ok(CreateChurchResponse { church, account })
    }

    pub async fn list_churches(&self, session: &Session) -> Result<Vec<Church>> {
        session.require_admin()?;
        self.churches.list_churches().await
    }

    /// Inactive churches keep their records but cannot raise new interest.
    pub async fn set_active(&self, session: &Session, id: Uuid, is_active: bool) -> Result<Church> {
        session.require_admin()?;
        let church = self.churches.set_church_active(id, is_active).await?;
        info!(church_id = %church.id, is_active, changed_by = %session.user_id, "church activation changed");
        Ok(church)
    }

    pub async fn get_church(&self, id: Uuid) -> Result<Church> {
        self.churches
            .get_church(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Church {} not found", id)))
    }
}

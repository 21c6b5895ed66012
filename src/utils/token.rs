use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{session::Session, user::Role};

pub const TEMPORARY_PASSWORD_LENGTH: usize = 16;

/// One-time password handed out with admin-provisioned accounts.
pub fn generate_temporary_password() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMPORARY_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub role: Role,
    pub party_id: Option<Uuid>,
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Session {
            user_id: claims.sub,
            role: claims.role,
            party_id: claims.party_id,
        }
    }
}

pub fn issue_token(secret: &str, session: &Session, expires_at: DateTime<Utc>) -> Result<String> {
    let claims = Claims {
        sub: session.user_id,
        exp: expires_at.timestamp().max(0) as usize,
        role: session.role,
        party_id: session.party_id,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Session> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims.into())
}

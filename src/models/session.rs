use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::interest::InterestSide;
use super::user::Role;
use crate::error::{Error, Result};

/// The authenticated caller, decoded from the bearer token and handed to
/// every service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
    /// Candidate id for candidate users, church id for church users.
    pub party_id: Option<Uuid>,
}

impl Session {
    pub fn require_admin(&self) -> Result<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(Error::Forbidden("Administrator access required".into()))
        }
    }

    pub fn require_superadmin(&self) -> Result<()> {
        match self.role {
            Role::SuperAdmin => Ok(()),
            Role::Admin | Role::Church | Role::Candidate => {
                Err(Error::Forbidden("Super administrator access required".into()))
            }
        }
    }

    pub fn candidate_id(&self) -> Result<Uuid> {
        match (self.role, self.party_id) {
            (Role::Candidate, Some(id)) => Ok(id),
            _ => Err(Error::Forbidden("Candidate access required".into())),
        }
    }

    pub fn church_id(&self) -> Result<Uuid> {
        match (self.role, self.party_id) {
            (Role::Church, Some(id)) => Ok(id),
            _ => Err(Error::Forbidden("Church access required".into())),
        }
    }

    /// The interest flag this caller is allowed to write, if any.
    pub fn interest_side(&self) -> Option<InterestSide> {
        match self.role {
            Role::Church => Some(InterestSide::Church),
            Role::Candidate => Some(InterestSide::Candidate),
            Role::Admin | Role::SuperAdmin => None,
        }
    }

    pub fn owns(&self, side: InterestSide, church_id: Uuid, candidate_id: Uuid) -> bool {
        let owned = match side {
            InterestSide::Church => church_id,
            InterestSide::Candidate => candidate_id,
        };
        self.interest_side() == Some(side) && self.party_id == Some(owned)
    }
}

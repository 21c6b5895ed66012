use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::auth_dto::ProvisionedAccountResponse;
use crate::models::church::Church;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateChurchPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChurchResponse {
    pub church: Church,
    pub account: ProvisionedAccountResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurchListResponse {
    pub items: Vec<Church>,
}

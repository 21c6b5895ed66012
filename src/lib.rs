pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::Stores;
use crate::services::{
    auth_service::AuthService, candidate_service::CandidateService,
    church_service::ChurchService, interest_service::InterestService, job_service::JobService,
    matching_service::MatchingService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub candidate_service: CandidateService,
    pub church_service: ChurchService,
    pub job_service: JobService,
    pub interest_service: InterestService,
    pub matching_service: MatchingService,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Self {
        let auth_service = AuthService::new(
            stores.users.clone(),
            stores.candidates.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
        );
        let candidate_service = CandidateService::new(stores.candidates.clone());
        let church_service = ChurchService::new(stores.churches.clone(), auth_service.clone());
        let job_service = JobService::new(stores.jobs.clone(), stores.candidates.clone());
        let matching_service = MatchingService::new(stores.interests.clone());
        let interest_service = InterestService::new(
            stores.interests,
            stores.candidates,
            stores.churches,
            matching_service.clone(),
        );

        Self {
            config: Arc::new(config),
            auth_service,
            candidate_service,
            church_service,
            job_service,
            interest_service,
            matching_service,
        }
    }
}

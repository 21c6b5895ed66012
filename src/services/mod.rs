pub mod auth_service;
pub mod candidate_service;
pub mod church_service;
pub mod interest_service;
pub mod job_service;
pub mod matching_service;

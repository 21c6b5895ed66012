pub mod candidate;
pub mod church;
pub mod interest;
pub mod job;
pub mod user;
pub mod session;

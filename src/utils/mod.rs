pub mod crypto;
pub mod media;
pub mod time;
pub mod token;
pub mod validation;

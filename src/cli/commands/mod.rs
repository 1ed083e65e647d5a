pub mod auth;
pub mod goals;

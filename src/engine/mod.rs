pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod movement;
pub mod physics;
pub mod router;
pub mod validator;

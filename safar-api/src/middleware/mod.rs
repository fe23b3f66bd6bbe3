pub mod auth;

pub use auth::{any_auth_middleware, guide_auth_middleware, tourist_auth_middleware, Claims};

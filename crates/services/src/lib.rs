pub mod auth;
pub mod authz;
pub mod calendar;
pub mod critique;
pub mod dao;

pub use auth::AuthService;
pub use authz::{AuthzError, ContextResolver, StudentContext, Viewer};
pub use critique::CritiqueService;
pub use dao::*;

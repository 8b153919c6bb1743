//! Data models shared across the console

pub mod auth;
pub mod envelope;
pub mod principal;

pub use envelope::{ErrorBody, HttpResponse, PagedResult};
pub use principal::{PermissionCode, Principal};

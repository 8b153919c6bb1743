//! Elidune Library Management System - Administration Console
//!
//! Client-side core of the Elidune admin console: authentication session
//! lifecycle over the remote REST API, permission-gated navigation, and a
//! generic CRUD page engine driven by declarative per-resource
//! configurations.

pub mod app;
pub mod auth;
pub mod config;
pub mod crud;
pub mod error;
pub mod http;
pub mod models;
pub mod nav;
pub mod pages;

pub use app::AdminApp;
pub use config::AppConfig;
pub use error::{AppError, AppResult};

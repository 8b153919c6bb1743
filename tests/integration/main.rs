//! Integration tests against a local mock of the remote API

mod auth_tests;
mod crud_tests;
mod support;

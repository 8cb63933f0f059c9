//! Request extractors that resolve the caller's identity.

pub mod auth;
pub mod rbac;

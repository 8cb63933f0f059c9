//! Token handling for the authorization collaborator.

pub mod jwt;

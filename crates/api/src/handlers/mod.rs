pub mod admin;
pub mod assets;

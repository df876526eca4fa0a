#[allow(clippy::module_inception)]
pub mod cache;
pub mod error;
pub mod expiration_reaper;

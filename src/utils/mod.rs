//! Utility modules shared across the engine.
//!
//! - [`ids`]: id factory helpers (uuid-backed default, deterministic
//!   sequential factory for tests)
//! - [`json_ext`]: typed readers over `serde_json::Value` used by the
//!   override whitelist

pub mod ids;
pub mod json_ext;

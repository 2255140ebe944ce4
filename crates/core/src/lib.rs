//! `sitegate-core` — gate configuration primitives.
//!
//! This crate contains **pure** values (no IO, no HTTP types): the protected
//! path prefix, the gate configuration and the configuration error model.

pub mod config;
pub mod error;
pub mod prefix;

pub use config::GateConfig;
pub use error::{ConfigError, ConfigResult};
pub use prefix::{ProtectedPrefix, normalize_path};

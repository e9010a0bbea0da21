//! SMS ↔ support-platform relay core.

pub mod classify;
pub mod config;
pub mod error;
pub mod phone;
pub mod platform;
pub mod relay;
pub mod resolver;

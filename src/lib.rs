//! SpectrumConnect - backend for users, therapists and appointments
//!
//! This library provides signed bearer-token authentication, per-request
//! identity resolution and role-gated HTTP endpoints over a pluggable store.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
pub use error::{AuthError, Result, SpectrumError};

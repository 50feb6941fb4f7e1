//! Auth service client module.
//!
//! This module provides:
//! - `AuthClient`: the seam the session validator checks tokens through
//! - `HttpAuthClient`: reqwest implementation against the launcher backend
//! - `ApiError`: HTTP and transport error taxonomy
//!
//! The backend uses bearer token authentication; the validator only ever
//! asks it one question - "is this token still good?".

pub mod client;
pub mod error;

pub use client::{AuthClient, AuthStatus, HttpAuthClient};
pub use error::ApiError;

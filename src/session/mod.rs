//! Session state and periodic validation.
//!
//! This module provides:
//! - `AuthUser`: an access token plus expiry, the state of a logged-in user
//! - `SessionValidator`: timer-driven two-stage token validation
//!
//! The validator owns at most one session at a time and exactly one timer;
//! starting it again for a new user replaces both.

pub mod user;
pub mod validator;

pub use user::AuthUser;
pub use validator::{SessionEvent, SessionValidator};

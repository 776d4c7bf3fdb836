//! Authentication module for the pretest server
//!
//! - bcrypt verification of admin credentials
//! - signed session cookies for the results dashboard

mod password;
mod service;
mod session;

pub use password::{hash_password, verify_password};
pub use service::{AuthError, AuthService};
pub use session::{
    issue_session_token, verify_session_token, SessionClaims, SessionError, SESSION_COOKIE,
};

//! HTTP handlers for the pretest server

pub mod admin;
pub mod auth;
pub mod health;
pub mod pages;
pub mod submissions;

pub use admin::{dashboard, view_result};
pub use auth::{login, login_page, logout};
pub use health::health_check;
pub use pages::{index, questions};
pub use submissions::{download, submit, upload_report};

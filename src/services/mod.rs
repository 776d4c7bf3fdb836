//! Business logic services for the pretest server

mod submissions;

pub use submissions::{load_submission, summarize_submissions, LoadError};

pub mod tracker;
pub mod validator;

pub use tracker::{StatusTracker, TrackerState};
pub use validator::{validate, validate_submission};

pub mod diff;
pub mod publish;
pub mod review;
pub mod types;

pub use review::{review_pull_request, run_review};
pub use types::{ReviewOutcome, ReviewTarget};

//! Inbound submission endpoints: request contract, scoring service and
//! router.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{IncompleteSubmissionResponse, SubmissionRequest, SubmissionResponse};
pub use router::{client_address, submission_router, REACTIONS_SUBMIT_PATH, TRAIT_SUBMIT_PATH};
pub use service::{Evaluation, SubmissionError, SubmissionOutcome, SubmissionService};

//! HTTP surface shared by the server and the remote store.
//!
//! Bodies are the domain types themselves: `GET` on [`SUBMISSIONS_PATH`]
//! returns `Vec<Submission>`, `POST` takes a `SubmissionInput` and answers
//! `201 Created` with the stored `Submission`. Failures carry an `ApiError`.

pub const HEALTH_PATH: &str = "/healthz";
pub const SUBMISSIONS_PATH: &str = "/submissions";

/// Upper bound for a create request body.
pub const MAX_SUBMISSION_BODY_BYTES: usize = 16 * 1024;

//! Use cases (application services)

pub mod cast_vote;
pub mod create_request;
pub mod error;
pub mod manage_extensions;
pub mod manage_request;
pub mod query_requests;
pub mod tally_request;

//! Request lifecycle: stored state, derived phase, transitions and
//! publish-time validation.

pub mod phase;
pub mod status;
pub mod transitions;
pub mod validation;

pub use status::{LifecycleState, RequestStatus};
pub use validation::{ValidationIssue, validate_for_publish, validate_structure};

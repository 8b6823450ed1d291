//! Validation of clustering results.
//!
//! Validators never raise: every outcome, including a violated precondition,
//! comes back as a [`ValidationResult`].

mod clustering;
mod result;

pub use clustering::{ClusteringValidator, ValidatorOptions};
pub use result::{ValidationResult, ValidationStatus};

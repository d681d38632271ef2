//! Unified error types for the enrollment engine.
//!
//! Business-rule violations (duplicate submission, quota, bad reference data,
//! illegal status transitions) get their own variants so callers can surface
//! them as field-level or 4xx-equivalent failures. Everything detected before
//! the first mutating statement aborts the enclosing transaction cleanly.

use thiserror::Error;

/// All error conditions the enrollment engine can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// A human-readable reference (country code, city name, polo name, course
    /// id) did not resolve against the reference data store.
    #[error("unknown {field}: '{value}'")]
    ReferenceNotFound {
        /// Input field whose lookup missed, for field-level error reporting
        field: &'static str,
        /// The value that failed to resolve
        value: String,
    },

    /// The national id already holds an enrollment for this course.
    #[error("national id '{national_id}' is already enrolled in course {course_id}")]
    DuplicateEnrollment {
        /// National id of the submitting candidate
        national_id: String,
        /// Course the duplicate submission targeted
        course_id: i64,
    },

    /// The national id already holds the maximum number of enrollments.
    #[error("national id '{national_id}' already holds {count} enrollments")]
    QuotaExceeded {
        /// National id of the submitting candidate
        national_id: String,
        /// Number of enrollments currently held
        count: u64,
    },

    /// An attempted status change is not allowed by the state machine.
    #[error("invalid enrollment transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// Status the enrollment currently holds
        from: crate::core::enrollment::EnrollmentStatus,
        /// Status the caller tried to move to
        to: crate::core::enrollment::EnrollmentStatus,
    },

    /// No enrollment matched the given id (or id + access hash).
    #[error("enrollment {id} not found")]
    EnrollmentNotFound {
        /// Enrollment primary key that missed
        id: i64,
    },

    /// A rejection was attempted without a reason. The reason is mandatory:
    /// it is logged and relayed to the candidate.
    #[error("rejection requires a reason")]
    MissingRejectionReason,

    /// The supplied access hash matched nothing (or did not match the
    /// requested enrollment). Deliberately does not say which part failed.
    #[error("access denied")]
    AccessDenied,

    /// No candidate matched the lookup.
    #[error("candidate {id} not found")]
    CandidateNotFound {
        /// Candidate primary key that missed
        id: i64,
    },

    /// No stored blob matched the opaque name.
    #[error("blob '{name}' not found")]
    BlobNotFound {
        /// Opaque blob name that missed
        name: String,
    },

    /// A notification could not be delivered. Reported only; never propagated
    /// out of the operation that triggered the notification.
    #[error("notification delivery failed: {message}")]
    Notification {
        /// Sink-supplied failure description
        message: String,
    },

    /// Invalid or missing configuration.
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Database error from SeaORM.
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (blob storage).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

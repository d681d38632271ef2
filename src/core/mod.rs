//! Core business logic for the enrollment engine, framework-agnostic and
//! driven entirely through `SeaORM` connections passed in by the caller.

/// Document blob storage behind an opaque-name trait
pub mod blob;
/// Candidate records and the self-service correction flow
pub mod candidate;
/// Civil-time helpers shared by deadlines and timestamps
pub mod clock;
/// Course administration and catalog listings
pub mod course;
/// Enrollment lifecycle: submission, state machine, capability access
pub mod enrollment;
/// Deadline expiration scans
pub mod expiration;
/// Outbound candidate notifications
pub mod notify;
/// Reference data lookups (countries, cities, polos, courses)
pub mod reference;

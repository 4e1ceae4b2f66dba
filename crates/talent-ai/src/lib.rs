//! Candidate screening for job roles.
//!
//! The scoring engine in [`workflows::screening`] is a pure function of a role
//! configuration and an evidence bundle. The service, repository, and router
//! layers around it handle persistence and HTTP intake.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

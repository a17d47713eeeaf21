//! Enrollment eligibility, course exploration, and scheduler projections for the student
//! enrollment portal.
//!
//! The evaluator and the projections built on top of it are pure functions over plain data
//! snapshots. The [`enrollment::service`] module composes them with a data provider so the HTTP
//! layer in `services/api` can expose them.

pub mod config;
pub mod enrollment;
pub mod error;
pub mod telemetry;
pub mod time;

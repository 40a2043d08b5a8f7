//! Contractor matching service core: deterministic scoring of service-provider
//! candidates with a bounded qualitative refinement step.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;

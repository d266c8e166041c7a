//! Career data merge and AI resilience classification engine.
//!
//! The `career-pipeline` binary is a thin wrapper around [`occupations::pipeline::run`];
//! every component can be driven in-process for tests.

pub mod config;
pub mod error;
pub mod occupations;
pub mod telemetry;

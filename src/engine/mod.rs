// src/engine/mod.rs

//! Orchestration engine for globdag.
//!
//! This module ties together:
//! - the task graph (registration, cycle rejection, ordering)
//! - glob resolution of each task's declared files
//! - the staleness decision
//! - sequential execution of due tasks
//!
//! The engine object lives in [`core`], the run pass in [`run`], and the
//! timestamp comparison in [`staleness`].

/// Canonical task id type used throughout the engine.
pub type TaskId = String;

pub mod core;
pub mod run;
pub mod staleness;

pub use self::core::Engine;
pub use staleness::RunDecision;

// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`task`] defines [`Task`] and the [`TaskBody`] capability.
//! - [`handles`] provides the [`InputFile`] / [`OutputFile`] handles given
//!   to bodies.
//! - [`adapter`] turns resolved paths into handles and invokes a body.
//! - [`command`] is a body that runs a shell command.

pub mod adapter;
pub mod command;
pub mod handles;
pub mod task;

pub use command::CommandTask;
pub use handles::{InputFile, OutputFile};
pub use task::{FnBody, Task, TaskBody, TaskContext, TaskFuture};

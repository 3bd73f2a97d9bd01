// src/dag/mod.rs

//! Task dependency graph.
//!
//! - [`graph`] stores registered tasks and enforces acyclicity on insert.
//! - [`edges`] infers producer -> consumer edges from declared patterns.
//! - [`sort`] contains the cycle check and the topological sort.

pub mod edges;
pub mod graph;
pub mod sort;

pub use edges::{EdgeGraph, infer_edges};
pub use graph::TaskGraph;

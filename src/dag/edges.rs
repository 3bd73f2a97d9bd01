// src/dag/edges.rs

//! Edge inference.
//!
//! Edge direction: producer -> consumer. For
//!
//! ```text
//! A: outputs = ["*.js"]
//! B: inputs  = ["*.js", "*.json"]
//! ```
//!
//! we add edge A -> B. Only the declared pattern text is compared; two
//! different patterns matching the same files do not create an edge.

use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::exec::Task;

/// Dependency graph over a slice of tasks.
///
/// Node `i` is `tasks[i]` (`NodeIndex::new(i)`), so node order is insertion
/// order. At most one edge exists per ordered pair.
pub type EdgeGraph = DiGraph<usize, ()>;

pub fn infer_edges<A>(tasks: &[Arc<Task<A>>]) -> EdgeGraph {
    let mut graph = DiGraph::with_capacity(tasks.len(), tasks.len());
    for i in 0..tasks.len() {
        graph.add_node(i);
    }

    for (to, consumer) in tasks.iter().enumerate() {
        for (from, producer) in tasks.iter().enumerate() {
            if from != to && producer.feeds(consumer) {
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
        }
    }

    graph
}

// src/dag/sort.rs

//! Cycle detection and topological ordering over an [`EdgeGraph`].

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::graph::NodeIndex;

use crate::dag::edges::EdgeGraph;

/// Direct successors of `node`, in insertion order.
fn successors(graph: &EdgeGraph, node: NodeIndex) -> Vec<NodeIndex> {
    let mut next: Vec<NodeIndex> = graph.neighbors_directed(node, Direction::Outgoing).collect();
    next.sort_unstable();
    next.dedup();
    next
}

/// Kahn's algorithm with insertion order as the tie-breaker.
///
/// Returns the nodes that could be ordered. When the graph has a cycle the
/// result is shorter than `graph.node_count()`; the caller decides what that
/// means.
pub fn kahn_order(graph: &EdgeGraph) -> Vec<NodeIndex> {
    let mut in_degree = vec![0usize; graph.node_count()];
    for node in graph.node_indices() {
        for next in successors(graph, node) {
            in_degree[next.index()] += 1;
        }
    }

    let mut queue: VecDeque<NodeIndex> = graph
        .node_indices()
        .filter(|n| in_degree[n.index()] == 0)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for next in successors(graph, node) {
            let degree = &mut in_degree[next.index()];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(next);
            }
        }
    }

    order
}

/// Depth-first search with a visited set and an on-stack set; a back-edge to
/// a node still on the stack is a cycle.
pub fn has_cycle(graph: &EdgeGraph) -> bool {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];

    graph
        .node_indices()
        .any(|start| !visited[start.index()] && dfs(graph, start, &mut visited, &mut on_stack))
}

fn dfs(graph: &EdgeGraph, node: NodeIndex, visited: &mut [bool], on_stack: &mut [bool]) -> bool {
    visited[node.index()] = true;
    on_stack[node.index()] = true;

    for next in successors(graph, node) {
        if on_stack[next.index()] {
            return true;
        }
        if !visited[next.index()] && dfs(graph, next, visited, on_stack) {
            return true;
        }
    }

    on_stack[node.index()] = false;
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::DiGraph;

    fn graph(nodes: usize, edges: &[(usize, usize)]) -> EdgeGraph {
        let mut g = DiGraph::new();
        for i in 0..nodes {
            g.add_node(i);
        }
        for &(a, b) in edges {
            g.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
        g
    }

    fn indices(order: &[NodeIndex]) -> Vec<usize> {
        order.iter().map(|n| n.index()).collect()
    }

    #[test]
    fn kahn_breaks_ties_by_insertion_order() {
        // 2 -> 0, 2 -> 1, 3 independent
        let g = graph(4, &[(2, 0), (2, 1)]);
        assert_eq!(indices(&kahn_order(&g)), vec![2, 3, 0, 1]);
    }

    #[test]
    fn successors_are_visited_in_insertion_order_regardless_of_edge_order() {
        // edges added "backwards" on purpose
        let g = graph(3, &[(0, 2), (0, 1)]);
        assert_eq!(indices(&kahn_order(&g)), vec![0, 1, 2]);
    }

    #[test]
    fn cycles_are_detected_and_truncate_the_order() {
        let acyclic = graph(3, &[(0, 1), (1, 2)]);
        assert!(!has_cycle(&acyclic));
        assert_eq!(kahn_order(&acyclic).len(), 3);

        let cyclic = graph(3, &[(0, 1), (1, 2), (2, 0)]);
        assert!(has_cycle(&cyclic));
        assert!(kahn_order(&cyclic).len() < 3);
    }

    #[test]
    fn shared_descendant_is_not_a_cycle() {
        // diamond: 0 -> 1 -> 3, 0 -> 2 -> 3
        let g = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert!(!has_cycle(&g));
    }
}

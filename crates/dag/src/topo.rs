//! Deterministic topological sort — Kahn's algorithm with ties broken by
//! source order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Topologically sort `ids` given a `dependsOn` edge list (`deps[id]` =
/// predecessors that must come before `id`). Returns `None` if the graph
/// contains a cycle. Ties among simultaneously-ready nodes are broken by
/// their position in `ids` (source order).
#[must_use]
pub fn topo_order(ids: &[String], deps: &HashMap<String, Vec<String>>) -> Option<Vec<String>> {
    let index_of: HashMap<&str, usize> =
        ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

    // Reverse adjacency: for each predecessor, which ids does it unblock.
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = ids.iter().map(|id| (id.as_str(), 0)).collect();

    for id in ids {
        let Some(predecessors) = deps.get(id) else { continue };
        for dep in predecessors {
            // Only counts as a graph edge if `dep` is itself a known node;
            // unknown deps are a validator concern (`MISSING_DEPENDENCY`),
            // not a cycle-detection one — ignore them here.
            if index_of.contains_key(dep.as_str()) {
                dependents.entry(dep.as_str()).or_default().push(id.as_str());
                *in_degree.get_mut(id.as_str()).unwrap() += 1;
            }
        }
    }

    // Min-heap keyed by source index so multiple ready nodes pop in
    // declaration order.
    let mut ready: BinaryHeap<Reverse<usize>> = ids
        .iter()
        .enumerate()
        .filter(|(_, id)| in_degree[id.as_str()] == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(ids.len());
    while let Some(Reverse(i)) = ready.pop() {
        let id = ids[i].as_str();
        order.push(id.to_string());
        if let Some(next) = dependents.get(id) {
            for &dependent in next {
                let degree = in_degree.get_mut(dependent).unwrap();
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(index_of[dependent]));
                }
            }
        }
    }

    if order.len() == ids.len() {
        Some(order)
    } else {
        None
    }
}

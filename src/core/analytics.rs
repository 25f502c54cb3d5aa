//! Read-only summaries over a finished dependency graph and its records.
//!
//! Every function here is a pure fold: nothing mutates the graph, and nodes
//! without a backing record simply contribute nothing.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::graph::{DependencyGraph, NodeId, RecordMap};

/// Number of dependency chains kept by [`longest_flows`].
pub const MAX_FLOWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedName {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub main_components: Vec<RankedName>,
    pub flows: Vec<Vec<NodeId>>,
    pub key_dependencies: Vec<RankedName>,
    pub circular_dependencies: Vec<Vec<NodeId>>,
}

impl AnalyticsReport {
    pub fn compute(
        records: &RecordMap,
        graph: &DependencyGraph,
        top_components: usize,
        top_dependencies: usize,
    ) -> Self {
        Self {
            main_components: ranked_components(records, top_components),
            flows: longest_flows(graph),
            key_dependencies: key_dependencies(graph, top_dependencies),
            circular_dependencies: circular_dependencies(graph),
        }
    }
}

/// Export names ranked by how often they are exported across all files.
///
/// Counts are summed over every export entry, not deduplicated per file.
/// Ties keep the order in which names were first seen.
pub fn ranked_components(records: &RecordMap, top_n: usize) -> Vec<RankedName> {
    let names = records
        .values()
        .flat_map(|record| record.exports.iter().map(|export| export.name.as_str()));
    top_counts(names, top_n)
}

/// Most depended-upon nodes, counted over every outbound list.
pub fn key_dependencies(graph: &DependencyGraph, top_n: usize) -> Vec<RankedName> {
    let targets = graph.node_ids().flat_map(|id| graph.outbound(id));
    top_counts(targets, top_n)
}

fn top_counts<'a>(items: impl Iterator<Item = &'a str>, top_n: usize) -> Vec<RankedName> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<RankedName> = Vec::new();
    for item in items {
        match positions.get(item) {
            Some(&pos) => ranked[pos].count += 1,
            None => {
                positions.insert(item, ranked.len());
                ranked.push(RankedName {
                    name: item.to_string(),
                    count: 1,
                });
            }
        }
    }
    // stable: equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_n);
    ranked
}

/// Longest simple dependency chains, one per still-unclaimed root.
///
/// Roots are tried in graph order. Each root gets a depth-first search whose
/// visited set covers only the current path, so cycles end a branch instead of
/// looping. The first longest path found is kept and all of its nodes are
/// claimed, which means later roots never start inside an earlier chain. The
/// result holds at most [`MAX_FLOWS`] chains, longest first, equal lengths in
/// discovery order.
///
/// The search enumerates simple paths, so its cost grows exponentially with
/// the size of densely connected import cycles. A few dozen files that all
/// import each other can take a long time.
pub fn longest_flows(graph: &DependencyGraph) -> Vec<Vec<NodeId>> {
    let mut claimed: HashSet<NodeIndex> = HashSet::new();
    let mut flows: Vec<Vec<NodeIndex>> = Vec::new();

    for root in graph.inner().node_indices() {
        if claimed.contains(&root) {
            continue;
        }
        let mut on_path = HashSet::new();
        let flow = longest_path_from(graph, root, &mut on_path);
        claimed.extend(flow.iter().copied());
        flows.push(flow);
    }

    flows.sort_by(|a, b| b.len().cmp(&a.len()));
    flows.truncate(MAX_FLOWS);

    let inner = graph.inner();
    flows
        .into_iter()
        .map(|flow| flow.into_iter().map(|idx| inner[idx].id.clone()).collect())
        .collect()
}

// Exhaustive over simple paths from `node`; exponential on dense cycles.
fn longest_path_from(
    graph: &DependencyGraph,
    node: NodeIndex,
    on_path: &mut HashSet<NodeIndex>,
) -> Vec<NodeIndex> {
    on_path.insert(node);

    let mut best: Vec<NodeIndex> = Vec::new();
    for next in graph.neighbor_indices(node, Direction::Outgoing) {
        if on_path.contains(&next) {
            continue;
        }
        let candidate = longest_path_from(graph, next, on_path);
        if candidate.len() > best.len() {
            best = candidate;
        }
    }

    on_path.remove(&node);

    let mut path = Vec::with_capacity(best.len() + 1);
    path.push(node);
    path.extend(best);
    path
}

/// Groups of files that import each other, directly or transitively.
///
/// A strongly connected component counts when it has more than one member or
/// a node imports itself. Members are sorted, as are the groups.
pub fn circular_dependencies(graph: &DependencyGraph) -> Vec<Vec<NodeId>> {
    let inner = graph.inner();
    let mut cycles: Vec<Vec<NodeId>> = kosaraju_scc(inner)
        .into_iter()
        .filter(|scc| scc.len() > 1 || inner.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut ids: Vec<NodeId> = scc.into_iter().map(|idx| inner[idx].id.clone()).collect();
            ids.sort();
            ids
        })
        .collect();
    cycles.sort();
    cycles
}
